//! Statement analysis handlers

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::{AppError, AppState};
use sift_core::ai::CompletionBackend;
use sift_core::extract::is_supported_document;
use sift_core::models::CombinedResult;

/// POST /api/analyze-statement - Run the analysis pipeline on an upload
pub async fn analyze_statement(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<CombinedResult>, AppError> {
    let pipeline = state
        .pipeline
        .as_ref()
        .ok_or_else(|| AppError::unavailable("AI backend not configured"))?;

    let mut upload: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request("Invalid multipart request"))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        // Reject unsupported extensions before touching the payload.
        if !is_supported_document(Path::new(&filename)) {
            return Err(AppError::bad_request(
                "Only PDF and image files are supported",
            ));
        }

        let data = field.bytes().await.map_err(|_| {
            AppError::bad_request("Invalid request body or file too large (max 10MB)")
        })?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or_else(|| AppError::bad_request("No file provided"))?;

    // Spool to a temp file keeping the original extension so the pipeline
    // dispatches on it. The file is removed when the handle drops.
    let extension = Path::new(&filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let tmp = tempfile::Builder::new()
        .suffix(&format!(".{}", extension))
        .tempfile()?;
    std::fs::write(tmp.path(), &data)?;

    info!(file = %filename, bytes = data.len(), "Analyzing uploaded statement");
    let result = pipeline.process(tmp.path()).await;

    Ok(Json(result))
}

/// GET /api/health - Service and backend status
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let ai_backend = match &state.ai {
        Some(client) => json!({
            "configured": true,
            "available": client.health_check().await,
            "host": client.host(),
            "model": client.model(),
        }),
        None => json!({ "configured": false, "available": false }),
    };

    Json(json!({
        "status": "healthy",
        "service": "sift",
        "ai_backend": ai_backend,
    }))
}
