//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sift_core::ai::CompletionClient;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    create_router_with_client(Some(CompletionClient::mock()), ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Encode one file field as a multipart/form-data body.
fn multipart_body(field_name: &str, filename: &str, content: &[u8]) -> (String, Vec<u8>) {
    let boundary = "sift-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

fn upload_request(field_name: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let (content_type, body) = multipart_body(field_name, filename, content);
    Request::builder()
        .method("POST")
        .uri("/api/analyze-statement")
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap()
}

// ========== Health Endpoint ==========

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "sift");
    assert_eq!(json["ai_backend"]["configured"], true);
    assert_eq!(json["ai_backend"]["available"], true);
}

#[tokio::test]
async fn test_health_without_backend() {
    let app = create_router_with_client(None, ServerConfig::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["ai_backend"]["configured"], false);
}

// ========== Statement Analysis ==========

#[tokio::test]
async fn test_analyze_image_statement() {
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request("file", "statement.png", b"fake png bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["extracted_text"]
        .as_str()
        .unwrap()
        .contains("ХААН БАНК"));
    assert_eq!(json["structured_data"]["bank_name"], "Khan Bank");
    assert_eq!(json["financial_analysis"]["total_transactions"], 3);
    assert_eq!(
        json["categorized_transactions"]["categorized_transactions"][0]["category"],
        "Income"
    );
    assert!(json["metadata"]["total_text_length"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_analyze_unreadable_pdf_degrades() {
    // Not a real PDF: extraction yields empty text, but the request still
    // succeeds and returns a complete result.
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request("file", "statement.pdf", b"not a real pdf"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["extracted_text"], "");
    assert_eq!(json["metadata"]["total_text_length"], 0);
}

#[tokio::test]
async fn test_rejects_unsupported_extension() {
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request("file", "statement.docx", b"word document"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Only PDF and image files are supported");
}

#[tokio::test]
async fn test_rejects_missing_file_field() {
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request("document", "statement.pdf", b"bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "No file provided");
}

#[tokio::test]
async fn test_rejects_oversized_upload() {
    let app = setup_test_app();

    let oversized = vec![0u8; MAX_UPLOAD_SIZE + 1];
    let response = app
        .oneshot(upload_request("file", "statement.png", &oversized))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unavailable_without_backend() {
    let app = create_router_with_client(None, ServerConfig::default());

    let response = app
        .oneshot(upload_request("file", "statement.png", b"fake png bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "AI backend not configured");
}
