//! Ollama backend implementation
//!
//! HTTP client for a local Ollama server. Text completions go through the
//! default model; statement image transcription goes through a separate
//! vision-capable model.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::CompletionBackend;

/// Ollama backend
///
/// # Configuration
///
/// - `OLLAMA_HOST`: server URL (required)
/// - `OLLAMA_MODEL`: text model (default: llama3.2)
/// - `OLLAMA_VISION_MODEL`: vision model for image transcription (default: llava)
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    default_model: String,
    vision_model: String,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(base_url: &str, default_model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model: default_model.to_string(),
            vision_model: "llava".to_string(),
        }
    }

    /// Create a new instance with a different vision model
    pub fn with_vision_model(&self, model: &str) -> Self {
        Self {
            vision_model: model.to_string(),
            ..self.clone()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        let vision = std::env::var("OLLAMA_VISION_MODEL").unwrap_or_else(|_| "llava".to_string());
        Some(Self::new(&host, &model).with_vision_model(&vision))
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Request to Ollama API with images (for vision models)
#[derive(Debug, Serialize)]
struct OllamaVisionRequest {
    model: String,
    prompt: String,
    images: Vec<String>,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl CompletionBackend for OllamaBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = OllamaRequest {
            model: self.default_model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Http(response.error_for_status().unwrap_err()));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        debug!("Ollama completion response: {}", ollama_response.response);

        Ok(ollama_response.response)
    }

    async fn complete_with_image(
        &self,
        prompt: &str,
        image_data: &[u8],
        _mime_type: &str,
    ) -> Result<String> {
        let base64_image = base64::engine::general_purpose::STANDARD.encode(image_data);

        let request = OllamaVisionRequest {
            model: self.vision_model.clone(),
            prompt: prompt.to_string(),
            images: vec![base64_image],
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Http(response.error_for_status().unwrap_err()));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        debug!("Ollama vision response: {}", ollama_response.response);

        Ok(ollama_response.response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.default_model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
