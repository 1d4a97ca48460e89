//! Pluggable AI backend abstraction
//!
//! This module provides a backend-agnostic interface for the two AI
//! operations the pipeline needs: text completion (statement structuring,
//! transaction categorization) and vision completion (statement image
//! transcription).
//!
//! # Architecture
//!
//! - `CompletionBackend` trait: defines the interface for all AI operations
//! - `CompletionClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OllamaBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! // Create from environment
//! let ai = CompletionClient::from_env();
//!
//! if let Some(ref client) = ai {
//!     let response = client.complete("Structure this statement...").await?;
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, ollama, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemini-2.0-flash)
//! - `GEMINI_BASE_URL`: API base URL override (points tests at a local server)
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)
//! - `OLLAMA_VISION_MODEL`: Vision model name (default: llava)

mod gemini;
mod mock;
mod ollama;
pub mod parsing;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use ollama::OllamaBackend;

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends must be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Run a text completion and return the raw response text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Run a completion over a prompt plus one attached image
    ///
    /// `mime_type` describes the image bytes (e.g. `image/png`).
    async fn complete_with_image(
        &self,
        prompt: &str,
        image_data: &[u8],
        mime_type: &str,
    ) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
/// All variants implement the same CompletionBackend operations.
#[derive(Clone)]
pub enum CompletionClient {
    /// Gemini backend (Generative Language REST API)
    Gemini(GeminiBackend),
    /// Ollama backend (local HTTP API)
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl CompletionClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `gemini` (default): Uses GEMINI_API_KEY, GEMINI_MODEL, GEMINI_BASE_URL
    /// - `ollama`: Uses OLLAMA_HOST, OLLAMA_MODEL, OLLAMA_VISION_MODEL
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" => GeminiBackend::from_env().map(CompletionClient::Gemini),
            "ollama" => OllamaBackend::from_env().map(CompletionClient::Ollama),
            "mock" => Some(CompletionClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to gemini");
                GeminiBackend::from_env().map(CompletionClient::Gemini)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        CompletionClient::Mock(MockBackend::new())
    }
}

// Implement CompletionBackend for CompletionClient by delegating to the inner backend
#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        match self {
            CompletionClient::Gemini(b) => b.complete(prompt).await,
            CompletionClient::Ollama(b) => b.complete(prompt).await,
            CompletionClient::Mock(b) => b.complete(prompt).await,
        }
    }

    async fn complete_with_image(
        &self,
        prompt: &str,
        image_data: &[u8],
        mime_type: &str,
    ) -> Result<String> {
        match self {
            CompletionClient::Gemini(b) => {
                b.complete_with_image(prompt, image_data, mime_type).await
            }
            CompletionClient::Ollama(b) => {
                b.complete_with_image(prompt, image_data, mime_type).await
            }
            CompletionClient::Mock(b) => b.complete_with_image(prompt, image_data, mime_type).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            CompletionClient::Gemini(b) => b.health_check().await,
            CompletionClient::Ollama(b) => b.health_check().await,
            CompletionClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            CompletionClient::Gemini(b) => b.model(),
            CompletionClient::Ollama(b) => b.model(),
            CompletionClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            CompletionClient::Gemini(b) => b.host(),
            CompletionClient::Ollama(b) => b.host(),
            CompletionClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_client_mock() {
        let client = CompletionClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = CompletionClient::mock();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_mock_complete() {
        let client = CompletionClient::mock();
        let response = client.complete("say something").await.unwrap();
        assert!(!response.is_empty());
    }
}
