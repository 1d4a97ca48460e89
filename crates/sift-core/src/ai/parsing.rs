//! JSON parsing helpers for AI backend responses
//!
//! Model responses usually wrap the requested JSON in prose, markdown
//! fences, or both. `extract_json_payload` recovers the most plausible
//! object candidate; the parse_* functions turn responses into domain data.

use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::StatementRecord;

/// Stub payload used when no JSON object can be recovered at all.
/// Deserializes into an empty "Unknown" statement.
const STUB_PAYLOAD: &str = r#"{"bank_name": "Unknown", "transactions": []}"#;

/// Recover a JSON object from a model response.
///
/// Three attempts, in order:
/// 1. The span from the first `{` to the last `}`, accepted when its brace
///    counts balance.
/// 2. The first singly-nested object found anywhere in the text.
/// 3. A stub statement object.
///
/// Always returns *something*; whether it parses is the caller's problem.
pub fn extract_json_payload(response: &str) -> String {
    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if start < end {
            let candidate = &response[start..=end];
            if candidate.matches('{').count() == candidate.matches('}').count() {
                return candidate.to_string();
            }
        }
    }

    let nested = Regex::new(r"\{[^{}]*\{[^{}]*\}[^{}]*\}").expect("valid regex");
    if let Some(m) = nested.find(response) {
        return m.as_str().to_string();
    }

    STUB_PAYLOAD.to_string()
}

/// Parse a structuring response into a StatementRecord.
///
/// Numeric coercion happens during deserialization, so a recovered payload
/// with string amounts still succeeds. Fails only when the recovered
/// payload is not valid JSON or not statement-shaped.
pub fn parse_statement(response: &str) -> Result<StatementRecord> {
    let payload = extract_json_payload(response);
    serde_json::from_str(&payload).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid statement JSON from AI: {} | Raw: {}",
            e,
            truncate_for_log(&payload)
        ))
    })
}

/// Parse a categorization response into one category per transaction.
///
/// Strict by design: the payload must carry a `categorized_transactions`
/// array and every entry must have a non-empty string `category`. Anything
/// less errors so the caller can fall back to keyword rules.
pub fn parse_categorization(response: &str) -> Result<Vec<String>> {
    let payload = extract_json_payload(response);
    let value: Value = serde_json::from_str(&payload).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid categorization JSON from AI: {} | Raw: {}",
            e,
            truncate_for_log(&payload)
        ))
    })?;

    let entries = value
        .get("categorized_transactions")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::InvalidData("No categorized_transactions array in AI response".into())
        })?;

    entries
        .iter()
        .map(|entry| {
            entry
                .get("category")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .ok_or_else(|| Error::InvalidData("Categorized entry missing category".into()))
        })
        .collect()
}

/// Truncate long payloads for error messages, respecting char boundaries.
fn truncate_for_log(s: &str) -> String {
    if s.chars().count() > 200 {
        let head: String = s.chars().take(200).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
