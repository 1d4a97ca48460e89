//! Statement processing pipeline
//!
//! Runs the four stages in order: extract text, structure it with the AI
//! backend, analyze the structured record, categorize its transactions.
//! The run itself never fails; each stage degrades on its own and the
//! combined result always has every section populated.
//!
//! Artifact saving is a separate concern. One run can be saved as five
//! files (raw text, structured record, analysis, categorized
//! transactions, combined result), each written independently so a single
//! failed write does not lose the rest.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, warn};

use crate::ai::CompletionClient;
use crate::analyzer::FinancialAnalyzer;
use crate::classifier::CategoryClassifier;
use crate::extract::{ExtractorClient, TextExtractor};
use crate::models::{CombinedResult, FileManifest, RunMetadata};
use crate::structurer::StatementStructurer;

/// Four-stage statement pipeline
#[derive(Clone)]
pub struct StatementPipeline {
    extractor: ExtractorClient,
    structurer: StatementStructurer,
    analyzer: FinancialAnalyzer,
    classifier: CategoryClassifier,
    output_dir: PathBuf,
}

impl StatementPipeline {
    /// Pipeline with the document extractor and all AI stages on the
    /// given backend. Artifacts go to the current directory unless
    /// [`with_output_dir`](Self::with_output_dir) changes that.
    pub fn new(ai: CompletionClient) -> Self {
        Self {
            extractor: ExtractorClient::document(ai.clone()),
            structurer: StatementStructurer::new(ai.clone()),
            analyzer: FinancialAnalyzer::new(),
            classifier: CategoryClassifier::new(ai),
            output_dir: PathBuf::from("."),
        }
    }

    /// Replace the extraction stage, e.g. with pre-extracted text.
    pub fn with_extractor(self, extractor: ExtractorClient) -> Self {
        Self { extractor, ..self }
    }

    pub fn with_output_dir(self, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..self
        }
    }

    /// Run all four stages over one document.
    pub async fn process(&self, source: &Path) -> CombinedResult {
        info!(source = %source.display(), "Processing statement");

        let extracted_text = self.extractor.extract(source).await;
        debug!(chars = extracted_text.chars().count(), "Extraction complete");

        let structured_data = self.structurer.structure(&extracted_text).await;
        debug!(
            bank = %structured_data.bank_name,
            transactions = structured_data.transactions.len(),
            "Structuring complete"
        );

        let financial_analysis = self.analyzer.analyze(&structured_data);
        let categorized_transactions = self.classifier.categorize(&structured_data).await;

        CombinedResult {
            metadata: RunMetadata {
                processed_at: Local::now().to_rfc3339(),
                source_file: source.display().to_string(),
                total_text_length: extracted_text.chars().count(),
            },
            extracted_text,
            structured_data,
            financial_analysis,
            categorized_transactions,
        }
    }

    /// Write the five artifacts for one run.
    ///
    /// Files are named `{prefix}_raw_ocr.txt`, `{prefix}_structured.json`,
    /// `{prefix}_analysis.json`, `{prefix}_categorized.json` and
    /// `{prefix}_complete.json` under the output directory. Without an
    /// explicit prefix a timestamped one is generated. Every write is
    /// independent; failures are logged and leave their manifest slot
    /// empty.
    pub fn save_artifacts(&self, result: &CombinedResult, prefix: Option<&str>) -> FileManifest {
        let prefix = match prefix {
            Some(p) => p.to_string(),
            None => format!("bank_analysis_{}", Local::now().format("%Y%m%d_%H%M%S")),
        };

        if let Err(err) = std::fs::create_dir_all(&self.output_dir) {
            warn!(
                dir = %self.output_dir.display(),
                error = %err,
                "Could not create output directory"
            );
        }

        let path_for = |suffix: &str| self.output_dir.join(format!("{prefix}{suffix}"));

        let manifest = FileManifest {
            ocr_file: write_artifact(
                path_for("_raw_ocr.txt"),
                result.extracted_text.as_bytes(),
            ),
            json_file: json_artifact(path_for("_structured.json"), &result.structured_data),
            analysis_file: json_artifact(path_for("_analysis.json"), &result.financial_analysis),
            categorized_file: json_artifact(
                path_for("_categorized.json"),
                &result.categorized_transactions,
            ),
            complete_file: match wide_json(result) {
                Ok(bytes) => write_artifact(path_for("_complete.json"), &bytes),
                Err(err) => {
                    warn!(error = %err, "Could not serialize combined result");
                    None
                }
            },
        };

        info!(prefix = %prefix, dir = %self.output_dir.display(), "Saved artifacts");
        manifest
    }

    /// Process one document and save its artifacts in a single pass,
    /// reporting what was written.
    pub async fn process_and_save(&self, source: &Path, prefix: Option<&str>) -> FileManifest {
        let result = self.process(source).await;
        self.save_artifacts(&result, prefix)
    }
}

fn write_artifact(path: PathBuf, contents: &[u8]) -> Option<PathBuf> {
    match std::fs::write(&path, contents) {
        Ok(()) => {
            debug!(path = %path.display(), "Wrote artifact");
            Some(path)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Could not write artifact");
            None
        }
    }
}

fn json_artifact<T: Serialize>(path: PathBuf, value: &T) -> Option<PathBuf> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => write_artifact(path, json.as_bytes()),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Could not serialize artifact");
            None
        }
    }
}

/// Combined-result serialization, indented four spaces.
fn wide_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATEMENT_TEXT: &str = "ХААН БАНК statement text for structuring";

    fn mock_pipeline() -> StatementPipeline {
        StatementPipeline::new(CompletionClient::mock())
            .with_extractor(ExtractorClient::fixed(STATEMENT_TEXT))
    }

    #[tokio::test]
    async fn test_process_populates_every_section() {
        let result = mock_pipeline().process(Path::new("statement.pdf")).await;

        assert_eq!(result.metadata.source_file, "statement.pdf");
        assert_eq!(
            result.metadata.total_text_length,
            STATEMENT_TEXT.chars().count()
        );
        assert!(result.metadata.processed_at.contains('T'));

        assert_eq!(result.extracted_text, STATEMENT_TEXT);
        assert_eq!(result.structured_data.bank_name, "Khan Bank");
        assert_eq!(result.structured_data.transactions.len(), 3);
        assert_eq!(result.financial_analysis.total_transactions, 3);
        assert_eq!(
            result
                .categorized_transactions
                .categorized_transactions
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn test_text_length_counts_characters_not_bytes() {
        let pipeline = StatementPipeline::new(CompletionClient::mock())
            .with_extractor(ExtractorClient::fixed("Цалин"));
        let result = pipeline.process(Path::new("statement.pdf")).await;
        assert_eq!(result.metadata.total_text_length, 5);
    }

    #[tokio::test]
    async fn test_save_artifacts_writes_five_files() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = mock_pipeline().with_output_dir(dir.path());
        let result = pipeline.process(Path::new("statement.pdf")).await;
        let manifest = pipeline.save_artifacts(&result, Some("run1"));

        let ocr = manifest.ocr_file.unwrap();
        assert_eq!(ocr, dir.path().join("run1_raw_ocr.txt"));
        assert_eq!(std::fs::read_to_string(&ocr).unwrap(), STATEMENT_TEXT);

        let structured = manifest.json_file.unwrap();
        assert_eq!(structured, dir.path().join("run1_structured.json"));
        let record: crate::models::StatementRecord =
            serde_json::from_str(&std::fs::read_to_string(&structured).unwrap()).unwrap();
        assert_eq!(record.bank_name, "Khan Bank");

        assert!(manifest.analysis_file.unwrap().exists());
        assert!(manifest.categorized_file.unwrap().exists());
        assert!(manifest.complete_file.unwrap().exists());
    }

    #[tokio::test]
    async fn test_combined_file_uses_wider_indent() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = mock_pipeline().with_output_dir(dir.path());
        let result = pipeline.process(Path::new("statement.pdf")).await;
        let manifest = pipeline.save_artifacts(&result, Some("indent"));

        let complete = std::fs::read_to_string(manifest.complete_file.unwrap()).unwrap();
        assert!(complete.starts_with("{\n    \""));

        let analysis = std::fs::read_to_string(manifest.analysis_file.unwrap()).unwrap();
        assert!(analysis.starts_with("{\n  \""));
    }

    #[tokio::test]
    async fn test_default_prefix_is_timestamped() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = mock_pipeline().with_output_dir(dir.path());
        let result = pipeline.process(Path::new("statement.pdf")).await;
        let manifest = pipeline.save_artifacts(&result, None);

        let name = manifest
            .complete_file
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(name.starts_with("bank_analysis_"));
        assert!(name.ends_with("_complete.json"));
        // bank_analysis_YYYYMMDD_HHMMSS_complete.json
        assert_eq!(name.len(), "bank_analysis_".len() + 15 + "_complete.json".len());
    }

    #[tokio::test]
    async fn test_failed_writes_leave_manifest_slots_empty() {
        // A file where the output directory should be makes every write fail.
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let pipeline = mock_pipeline().with_output_dir(blocker.path().join("out"));
        let result = pipeline.process(Path::new("statement.pdf")).await;
        let manifest = pipeline.save_artifacts(&result, Some("lost"));

        assert!(manifest.ocr_file.is_none());
        assert!(manifest.json_file.is_none());
        assert!(manifest.analysis_file.is_none());
        assert!(manifest.categorized_file.is_none());
        assert!(manifest.complete_file.is_none());
    }

    #[tokio::test]
    async fn test_process_and_save_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = mock_pipeline().with_output_dir(dir.path());
        let manifest = pipeline
            .process_and_save(Path::new("statement.pdf"), Some("both"))
            .await;

        assert!(manifest.ocr_file.unwrap().exists());
        assert!(manifest.complete_file.unwrap().exists());
    }
}
