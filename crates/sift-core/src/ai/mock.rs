//! Mock backend for testing
//!
//! Provides configurable mock responses for both AI operations.
//! Useful for unit tests and development without an API key.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{Error, Result};

use super::CompletionBackend;

/// Canned statement JSON wrapped in prose, the way real models answer. One
/// amount is a formatted string to exercise lenient coercion downstream.
const STATEMENT_RESPONSE: &str = r#"Here is the structured statement you asked for:

{"bank_name": "Khan Bank", "account_holder": "Bat-Erdene", "statement_period": "2024-01-01 - 2024-01-31", "opening_balance": 1000.0, "closing_balance": 2454.7, "transactions": [
  {"date": "2024-01-05", "description": "Цалин - Salary payment", "amount": "1,500.00", "type": "deposit"},
  {"date": "2024-01-07", "description": "Хүнсний дэлгүүр - Grocery store", "amount": -45.3, "type": "withdrawal"},
  {"date": "2024-01-08", "description": "Taxi ride", "amount": -12.0, "type": "withdrawal"}
]}

Let me know if you need anything else."#;

/// Canned transcription of a statement image.
const TRANSCRIPT_RESPONSE: &str = "ХААН БАНК\n\
Дансны хуулга: 2024-01-01 - 2024-01-31\n\
Данс эзэмшигч: Bat-Erdene\n\
Эхний үлдэгдэл: 1,000.00\n\
2024-01-05  Цалин - Salary payment  +1,500.00\n\
2024-01-07  Хүнсний дэлгүүр - Grocery store  -45.30\n\
2024-01-08  Taxi ride  -12.00\n\
Эцсийн үлдэгдэл: 2,454.70";

/// Mock AI backend for testing
///
/// Returns predictable responses keyed off the prompt content.
/// Can be scripted with a fixed response or forced to fail.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Fixed response overriding the prompt dispatch
    response: Option<String>,
    /// When set, every completion fails
    fail: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            response: None,
            fail: false,
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            response: None,
            fail: false,
        }
    }

    /// Create a mock that returns the given response for every completion
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            healthy: true,
            response: Some(response.into()),
            fail: false,
        }
    }

    /// Create a mock whose completions always fail
    pub fn failing() -> Self {
        Self {
            healthy: true,
            response: None,
            fail: true,
        }
    }
}

/// Echo the transaction list embedded in a categorization prompt, attaching
/// a category to each entry.
fn categorize_mock(prompt: &str) -> String {
    let transactions: Vec<Value> = prompt
        .find("Transactions to categorize:")
        .and_then(|idx| extract_json_array(&prompt[idx..]))
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default();

    let categorized: Vec<Value> = transactions
        .into_iter()
        .map(|mut tx| {
            let category = tx
                .get("description")
                .and_then(|d| d.as_str())
                .map(guess_category)
                .unwrap_or("Other");
            if let Some(obj) = tx.as_object_mut() {
                obj.insert("category".to_string(), json!(category));
            }
            tx
        })
        .collect();

    json!({ "categorized_transactions": categorized }).to_string()
}

fn guess_category(description: &str) -> &'static str {
    let desc = description.to_lowercase();
    if desc.contains("salary") || desc.contains("цалин") {
        "Income"
    } else if desc.contains("grocery") || desc.contains("restaurant") || desc.contains("хүнсний") {
        "Food & Dining"
    } else if desc.contains("taxi") || desc.contains("такси") {
        "Transportation"
    } else {
        "Other"
    }
}

/// First bracket-balanced JSON array in the text. Naive about brackets
/// inside strings, which canned prompts never contain.
fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    for (i, ch) in text[start..].char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if self.fail {
            return Err(Error::Backend("mock backend failure".into()));
        }
        if let Some(ref response) = self.response {
            return Ok(response.clone());
        }

        if prompt.contains("Categorize the following bank transactions") {
            return Ok(categorize_mock(prompt));
        }
        if prompt.contains("TEXT TO ANALYZE") {
            return Ok(STATEMENT_RESPONSE.to_string());
        }

        Ok("Mock response".to_string())
    }

    async fn complete_with_image(
        &self,
        _prompt: &str,
        _image_data: &[u8],
        _mime_type: &str,
    ) -> Result<String> {
        if self.fail {
            return Err(Error::Backend("mock backend failure".into()));
        }
        if let Some(ref response) = self.response {
            return Ok(response.clone());
        }

        Ok(TRANSCRIPT_RESPONSE.to_string())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
