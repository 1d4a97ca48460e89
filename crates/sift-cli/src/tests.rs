//! CLI command tests
//!
//! This module contains all tests for the CLI commands. Commands run
//! against the mock AI backend, so no network access is involved.

use std::path::{Path, PathBuf};

use clap::Parser;
use sift_core::ai::CompletionClient;
use tempfile::TempDir;

use crate::cli::{Cli, Commands};
use crate::commands;

/// Drop a small fake statement file into `dir`. The mock backend answers
/// with canned data, so the bytes only matter for the extension dispatch.
fn fake_statement(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, "ХААН БАНК дансны хуулга").unwrap();
    path
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_serve_defaults() {
    let cli = Cli::try_parse_from(["sift", "serve"]).unwrap();
    match cli.command {
        Commands::Serve {
            port,
            host,
            cors_origin,
        } => {
            assert_eq!(port, 8000);
            assert_eq!(host, "127.0.0.1");
            assert!(cors_origin.is_empty());
        }
        _ => panic!("expected the serve command"),
    }
}

#[test]
fn test_serve_repeatable_cors_origins() {
    let cli = Cli::try_parse_from([
        "sift",
        "serve",
        "--cors-origin",
        "http://localhost:5173",
        "--cors-origin",
        "https://app.example.com",
    ])
    .unwrap();
    match cli.command {
        Commands::Serve { cors_origin, .. } => assert_eq!(cors_origin.len(), 2),
        _ => panic!("expected the serve command"),
    }
}

#[test]
fn test_verbose_is_global() {
    let cli = Cli::try_parse_from(["sift", "analyze", "--file", "a.pdf", "--verbose"]).unwrap();
    assert!(cli.verbose);
}

#[test]
fn test_analyze_requires_file() {
    assert!(Cli::try_parse_from(["sift", "analyze"]).is_err());
}

// ========== Input Validation Tests ==========

#[tokio::test]
async fn test_analyze_rejects_missing_file() {
    let result = commands::cmd_analyze(
        CompletionClient::mock(),
        Path::new("no_such_statement.pdf"),
        None,
        None,
        true,
    )
    .await;
    let err = result.unwrap_err().to_string();
    assert!(err.contains("not found"), "unexpected error: {err}");
}

#[tokio::test]
async fn test_analyze_rejects_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = fake_statement(&dir, "statement.docx");

    let result = commands::cmd_analyze(CompletionClient::mock(), &path, None, None, true).await;
    let err = result.unwrap_err().to_string();
    assert!(
        err.contains("Unsupported file type"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn test_extract_rejects_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = fake_statement(&dir, "notes.txt");

    let result = commands::cmd_extract(CompletionClient::mock(), &path, None).await;
    assert!(result.is_err());
}

// ========== Analyze Command Tests ==========

#[tokio::test]
async fn test_analyze_writes_artifacts() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let path = fake_statement(&dir, "statement.png");

    let result = commands::cmd_analyze(
        CompletionClient::mock(),
        &path,
        Some("cli_run"),
        Some(out.path()),
        false,
    )
    .await;
    assert!(result.is_ok());

    let complete = out.path().join("cli_run_complete.json");
    let raw = std::fs::read_to_string(complete).unwrap();
    let parsed: sift_core::models::CombinedResult = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.structured_data.bank_name, "Khan Bank");
    assert_eq!(parsed.financial_analysis.total_transactions, 3);
}

#[tokio::test]
async fn test_analyze_no_save_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let path = fake_statement(&dir, "statement.png");

    let result = commands::cmd_analyze(
        CompletionClient::mock(),
        &path,
        Some("cli_run"),
        Some(out.path()),
        true,
    )
    .await;
    assert!(result.is_ok());
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

// ========== Extract Command Tests ==========

#[tokio::test]
async fn test_extract_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let path = fake_statement(&dir, "statement.jpg");
    let out = dir.path().join("text.txt");

    let result = commands::cmd_extract(CompletionClient::mock(), &path, Some(&out)).await;
    assert!(result.is_ok());

    let text = std::fs::read_to_string(out).unwrap();
    assert!(text.contains("ХААН БАНК"));
}
