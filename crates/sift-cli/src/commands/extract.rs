//! Text extraction command implementation

use std::path::Path;

use anyhow::{Context, Result};
use sift_core::ai::CompletionClient;
use sift_core::extract::{ExtractorClient, TextExtractor};

use super::ensure_supported_input;

/// Extract raw text from a statement and print or save it
pub async fn cmd_extract(ai: CompletionClient, file: &Path, output: Option<&Path>) -> Result<()> {
    ensure_supported_input(file)?;

    let extractor = ExtractorClient::document(ai);
    let text = extractor.extract(file).await;

    if text.is_empty() {
        println!("⚠️  No text could be extracted from {}", file.display());
        return Ok(());
    }

    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ Extracted text saved to: {}", path.display());
        }
        None => println!("{}", text),
    }

    Ok(())
}
