//! Gemini backend implementation
//!
//! HTTP client for the Google Generative Language REST API
//! (`models/{model}:generateContent`). Text and vision requests share the
//! same endpoint; vision requests attach the image as an inline_data part.
//!
//! # Configuration
//!
//! Environment variables:
//! - `GEMINI_API_KEY`: API key (required)
//! - `GEMINI_MODEL`: Model name (default: gemini-2.0-flash)
//! - `GEMINI_BASE_URL`: Base URL override, used to point tests at a local
//!   mock server (default: https://generativelanguage.googleapis.com)

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::CompletionBackend;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini backend
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Create from environment variables
    ///
    /// Required: `GEMINI_API_KEY`
    /// Optional: `GEMINI_MODEL`, `GEMINI_BASE_URL`
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Some(Self::new(&base_url, &api_key, &model))
    }

    /// Run one generateContent call and concatenate the candidate text parts
    async fn generate(&self, parts: Vec<Part>) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .http_client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Backend(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let gemini_response: GenerateContentResponse = response.json().await?;

        let text: String = gemini_response
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Backend("Empty response from Gemini API".into()));
        }

        debug!("Gemini completion response: {}", text);
        Ok(text)
    }
}

/// Request to the generateContent endpoint
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

/// One content block (a single user turn)
#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

/// Request part: plain text or inline image data
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

/// Base64 image payload for vision requests
#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Response from the generateContent endpoint
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.generate(vec![Part::Text {
            text: prompt.to_string(),
        }])
        .await
    }

    async fn complete_with_image(
        &self,
        prompt: &str,
        image_data: &[u8],
        mime_type: &str,
    ) -> Result<String> {
        let base64_image = base64::engine::general_purpose::STANDARD.encode(image_data);

        self.generate(vec![
            Part::Text {
                text: prompt.to_string(),
            },
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.to_string(),
                    data: base64_image,
                },
            },
        ])
        .await
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/v1beta/models", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
