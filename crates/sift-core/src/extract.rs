//! Document text extraction
//!
//! First pipeline stage: turn a statement document into raw text. PDFs go
//! through text-layer extraction; images go through the vision-capable AI
//! backend. Extraction never fails across this boundary: unreadable input
//! degrades to empty text (logged) and the rest of the pipeline carries on.

use std::path::Path;

use async_trait::async_trait;
use tracing::warn;

use crate::ai::{CompletionBackend, CompletionClient};
use crate::prompts;

/// File extensions accepted at the pipeline boundary.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["pdf", "png", "jpg", "jpeg"];

/// Check whether a file name has a supported extension (case-insensitive).
///
/// Transport surfaces reject anything else before pipeline entry.
pub fn is_supported_document(path: &Path) -> bool {
    match file_extension(path) {
        Some(ext) => SUPPORTED_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

fn image_mime(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        _ => "image/jpeg",
    }
}

/// Trait defining the text extraction boundary
///
/// May return empty text; never errors across the boundary.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the text content of the document at `path`
    async fn extract(&self, path: &Path) -> String;
}

/// Concrete extractor enum
///
/// Provides Clone and compile-time dispatch, mirroring the AI client.
#[derive(Clone)]
pub enum ExtractorClient {
    /// Production extractor (PDF text layer + vision OCR)
    Document(DocumentExtractor),
    /// Canned text for tests
    Fixed(FixedExtractor),
}

impl ExtractorClient {
    /// Create the production extractor over an AI backend
    pub fn document(ai: CompletionClient) -> Self {
        ExtractorClient::Document(DocumentExtractor::new(ai))
    }

    /// Create an extractor that returns fixed text for any path
    pub fn fixed(text: impl Into<String>) -> Self {
        ExtractorClient::Fixed(FixedExtractor::new(text))
    }
}

#[async_trait]
impl TextExtractor for ExtractorClient {
    async fn extract(&self, path: &Path) -> String {
        match self {
            ExtractorClient::Document(e) => e.extract(path).await,
            ExtractorClient::Fixed(e) => e.extract(path).await,
        }
    }
}

/// Production document extractor
///
/// PDFs use their embedded text layer; scan-only PDFs therefore degrade to
/// empty text. Images are transcribed by the vision backend.
#[derive(Clone)]
pub struct DocumentExtractor {
    ai: CompletionClient,
}

impl DocumentExtractor {
    pub fn new(ai: CompletionClient) -> Self {
        Self { ai }
    }

    fn extract_pdf(&self, path: &Path) -> String {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read PDF");
                return String::new();
            }
        };

        match pdf_extract::extract_text_from_mem(&bytes) {
            Ok(text) => {
                if text.trim().is_empty() {
                    warn!(path = %path.display(), "PDF has no text layer");
                }
                text
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "PDF text extraction failed");
                String::new()
            }
        }
    }

    async fn extract_image(&self, path: &Path, ext: &str) -> String {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read image");
                return String::new();
            }
        };

        match self
            .ai
            .complete_with_image(prompts::transcription_prompt(), &bytes, image_mime(ext))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Image transcription failed");
                String::new()
            }
        }
    }
}

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, path: &Path) -> String {
        match file_extension(path).as_deref() {
            Some("pdf") => self.extract_pdf(path),
            Some(ext @ ("png" | "jpg" | "jpeg")) => self.extract_image(path, ext).await,
            _ => {
                warn!(path = %path.display(), "Unsupported document type, returning empty text");
                String::new()
            }
        }
    }
}

/// Extractor that returns canned text regardless of path
#[derive(Clone)]
pub struct FixedExtractor {
    text: String,
}

impl FixedExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl TextExtractor for FixedExtractor {
    async fn extract(&self, _path: &Path) -> String {
        self.text.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_document(Path::new("statement.pdf")));
        assert!(is_supported_document(Path::new("scan.PNG")));
        assert!(is_supported_document(Path::new("photo.Jpeg")));
        assert!(!is_supported_document(Path::new("report.docx")));
        assert!(!is_supported_document(Path::new("noextension")));
        assert!(!is_supported_document(Path::new("archive.tar.gz")));
    }

    #[tokio::test]
    async fn test_fixed_extractor_ignores_path() {
        let extractor = ExtractorClient::fixed("canned statement text");
        let text = extractor.extract(Path::new("/does/not/exist.pdf")).await;
        assert_eq!(text, "canned statement text");
    }

    #[tokio::test]
    async fn test_missing_pdf_degrades_to_empty() {
        let extractor = ExtractorClient::document(CompletionClient::mock());
        let text = extractor.extract(Path::new("/does/not/exist.pdf")).await;
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_extension_degrades_to_empty() {
        let extractor = ExtractorClient::document(CompletionClient::mock());
        let text = extractor.extract(Path::new("/tmp/whatever.docx")).await;
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_image_goes_through_vision_backend() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[0x89, 0x50, 0x4e, 0x47]).unwrap();

        let extractor = ExtractorClient::document(CompletionClient::mock());
        let text = extractor.extract(file.path()).await;
        assert!(text.contains("ХААН БАНК"));
    }

    #[tokio::test]
    async fn test_failing_backend_degrades_image_to_empty() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&[0xff, 0xd8, 0xff]).unwrap();

        let ai = CompletionClient::Mock(crate::ai::MockBackend::failing());
        let extractor = ExtractorClient::document(ai);
        let text = extractor.extract(file.path()).await;
        assert!(text.is_empty());
    }
}
