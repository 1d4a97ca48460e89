//! Test utilities for sift-core
//!
//! This module provides testing infrastructure including a mock Gemini
//! server that can be used for development and integration tests. The
//! server speaks just enough of the generateContent wire format to drive
//! [`GeminiBackend`](crate::ai::GeminiBackend); response content comes
//! from [`MockBackend`](crate::ai::MockBackend), so HTTP-level tests see
//! the same canned answers as in-process ones.

use axum::{
    extract::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

use crate::ai::{CompletionBackend, MockBackend};

/// Mock Gemini server for testing and development
pub struct MockGeminiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/v1beta/models", get(handle_models))
            .route("/v1beta/models/:model", post(handle_generate));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Model listing endpoint (health check)
async fn handle_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: vec![ModelInfo {
            name: "models/gemini-2.0-flash".to_string(),
        }],
    })
}

/// generateContent endpoint
///
/// Pulls the prompt out of the first text part and answers through
/// `MockBackend`, treating any inline_data part as a vision request.
async fn handle_generate(Json(request): Json<GenerateRequest>) -> Json<GenerateResponse> {
    let parts = request
        .contents
        .first()
        .map(|c| c.parts.as_slice())
        .unwrap_or_default();

    let prompt = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n");
    let has_image = parts.iter().any(|p| p.inline_data.is_some());

    let backend = MockBackend::new();
    let response = if has_image {
        backend
            .complete_with_image(&prompt, b"", "image/png")
            .await
            .unwrap()
    } else {
        backend.complete(&prompt).await.unwrap()
    };

    Json(GenerateResponse {
        candidates: vec![CandidateOut {
            content: ContentOut {
                parts: vec![PartOut { text: response }],
            },
        }],
    })
}

// Request/Response types for the mock server

#[derive(Debug, Serialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    contents: Vec<ContentIn>,
}

#[derive(Debug, Deserialize)]
struct ContentIn {
    #[serde(default)]
    parts: Vec<PartIn>,
}

#[derive(Debug, Deserialize)]
struct PartIn {
    text: Option<String>,
    inline_data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    candidates: Vec<CandidateOut>,
}

#[derive(Debug, Serialize)]
struct CandidateOut {
    content: ContentOut,
}

#[derive(Debug, Serialize)]
struct ContentOut {
    parts: Vec<PartOut>,
}

#[derive(Debug, Serialize)]
struct PartOut {
    text: String,
}
