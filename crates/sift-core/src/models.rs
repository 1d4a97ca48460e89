//! Domain models for Sift
//!
//! The structured-statement types deserialize leniently: amounts and labels
//! arrive from an AI backend in unpredictable shapes, so every numeric field
//! funnels through [`crate::normalize`] during deserialization and every
//! label tolerates non-string values. A `StatementRecord` therefore carries
//! only finite `f64` amounts no matter what the backend produced.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::normalize::normalize_amount;

fn unknown() -> String {
    "Unknown".to_string()
}

fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_amount(&value))
}

fn lenient_amount_opt<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(normalize_amount(&other)),
    })
}

/// Labels default to "Unknown" when missing or non-textual.
fn lenient_label<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => unknown(),
    })
}

/// Free text defaults to empty when missing or non-textual.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// A structured bank statement produced from extracted document text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementRecord {
    #[serde(default = "unknown", deserialize_with = "lenient_label")]
    pub bank_name: String,
    #[serde(default = "unknown", deserialize_with = "lenient_label")]
    pub account_holder: String,
    #[serde(default = "unknown", deserialize_with = "lenient_label")]
    pub statement_period: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub opening_balance: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub closing_balance: f64,
    #[serde(
        default,
        deserialize_with = "lenient_amount_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_deposits: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_amount_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_withdrawals: Option<f64>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Head of the raw input, present only on the structuring fallback record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl StatementRecord {
    /// Degraded record returned when structuring fails. Identity fields are
    /// "Unknown", balances zero, and the first 1000 characters of the raw
    /// input ride along for diagnosis.
    pub fn fallback(raw_text: &str) -> Self {
        Self {
            bank_name: unknown(),
            account_holder: unknown(),
            statement_period: unknown(),
            opening_balance: 0.0,
            closing_balance: 0.0,
            total_deposits: None,
            total_withdrawals: None,
            transactions: Vec::new(),
            raw_text: Some(raw_text.chars().take(1000).collect()),
        }
    }
}

/// A single statement line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default = "unknown", deserialize_with = "lenient_label")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    /// Signed amount: negative for withdrawals, positive for deposits.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "String::is_empty"
    )]
    pub tx_type: String,
    /// Set by the classifier; absent until categorization runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Any extra backend-supplied fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Transaction {
    pub fn new(date: impl Into<String>, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
            tx_type: String::new(),
            category: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Aggregate spending metrics over one statement.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SpendingInsights {
    pub total_spent: f64,
    pub total_earned: f64,
    pub net_flow: f64,
    pub average_transaction: f64,
    pub withdrawal_count: usize,
    pub deposit_count: usize,
}

/// Per-month spending/earning bucket.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MonthEntry {
    pub spent: f64,
    pub earned: f64,
}

/// Day-by-day signed flow and its summary statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CashFlowAnalysis {
    pub daily_cash_flow: BTreeMap<String, f64>,
    pub average_daily_flow: f64,
    pub days_with_positive_flow: usize,
    pub days_with_negative_flow: usize,
}

/// Full rule-based analysis of a structured statement.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisReport {
    pub total_transactions: usize,
    pub spending_insights: SpendingInsights,
    pub monthly_summary: BTreeMap<String, MonthEntry>,
    pub top_categories: BTreeMap<String, f64>,
    pub cash_flow_analysis: CashFlowAnalysis,
}

/// Transactions with categories attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizedResult {
    pub categorized_transactions: Vec<Transaction>,
    /// Backend response kept for diagnosis when it answered but could not
    /// be parsed into per-transaction categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// Provenance for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub processed_at: String,
    pub source_file: String,
    pub total_text_length: usize,
}

/// Everything one pipeline run produces for a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedResult {
    pub metadata: RunMetadata,
    pub extracted_text: String,
    pub structured_data: StatementRecord,
    pub financial_analysis: AnalysisReport,
    pub categorized_transactions: CategorizedResult,
}

/// Paths of the artifacts written by one save pass.
///
/// Saves are best-effort and independent; a failed write leaves its slot
/// empty rather than failing the run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorized_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete_file: Option<PathBuf>,
}
