//! Sift Core Library
//!
//! Shared functionality for the Sift bank statement analyzer:
//! - Text extraction from PDF and image statements
//! - AI structuring of raw statement text into typed records
//! - Rule-based financial analysis (spending, monthly, cash flow)
//! - AI-first transaction categorization with keyword fallback
//! - Pluggable completion backends (Gemini, Ollama)
//! - End-to-end pipeline with artifact saving

pub mod ai;
pub mod analyzer;
pub mod classifier;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod structurer;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{CompletionBackend, CompletionClient, GeminiBackend, MockBackend, OllamaBackend};
pub use analyzer::FinancialAnalyzer;
pub use classifier::CategoryClassifier;
pub use error::{Error, Result};
pub use extract::{is_supported_document, ExtractorClient, TextExtractor, SUPPORTED_EXTENSIONS};
pub use models::{
    AnalysisReport, CashFlowAnalysis, CategorizedResult, CombinedResult, FileManifest, MonthEntry,
    RunMetadata, SpendingInsights, StatementRecord, Transaction,
};
pub use pipeline::StatementPipeline;
pub use structurer::StatementStructurer;
