//! CLI command implementations
//!
//! Commands are organized by pipeline stage:
//! - `analyze` - Full pipeline run (extract, structure, analyze, categorize)
//! - `extract` - Text extraction only
//! - `serve` - Web server command

pub mod analyze;
pub mod extract;
pub mod serve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use extract::*;
pub use serve::*;

use std::path::Path;

use anyhow::{bail, Context, Result};
use sift_core::ai::CompletionClient;
use sift_core::extract::{is_supported_document, SUPPORTED_EXTENSIONS};

/// Build the AI client from environment variables
pub fn connect_ai() -> Result<CompletionClient> {
    CompletionClient::from_env()
        .context("AI backend not configured (set GEMINI_API_KEY or OLLAMA_HOST)")
}

/// Reject inputs the pipeline cannot read. The only hard failure in the
/// workflow; everything downstream degrades instead of erroring.
pub fn ensure_supported_input(file: &Path) -> Result<()> {
    if !file.exists() {
        bail!("File '{}' not found", file.display());
    }
    if !is_supported_document(file) {
        bail!(
            "Unsupported file type '{}' (supported: {})",
            file.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        );
    }
    Ok(())
}
