//! AI-first transaction categorization
//!
//! Fourth pipeline stage: attaches one category label to every
//! transaction. The backend answer is authoritative when it names exactly
//! one category per transaction; anything short of that degrades to
//! keyword rules so the stage always produces a fully labeled list.

use tracing::{debug, warn};

use crate::ai::parsing::parse_categorization;
use crate::ai::{CompletionBackend, CompletionClient};
use crate::models::{CategorizedResult, StatementRecord, Transaction};
use crate::prompts;

// Keyword fallback table. Deliberately coarser than the categories the
// prompt offers the backend; it only has to keep the pipeline moving.
const FOOD_KEYWORDS: [&str; 4] = ["restaurant", "cafe", "food", "grocery"];
const TRANSPORT_KEYWORDS: [&str; 4] = ["fuel", "taxi", "bus", "transport"];

/// Transaction categorizer backed by a completion model
#[derive(Clone)]
pub struct CategoryClassifier {
    ai: CompletionClient,
}

impl CategoryClassifier {
    pub fn new(ai: CompletionClient) -> Self {
        Self { ai }
    }

    /// Categorize every transaction in the record, AI first, keyword
    /// rules second.
    ///
    /// Never fails. A backend error falls back to keyword rules with
    /// `raw_response` left empty; a backend answer that cannot be applied
    /// falls back too but keeps the answer in `raw_response` for
    /// diagnosis. The record's transactions are cloned, never mutated.
    pub async fn categorize(&self, record: &StatementRecord) -> CategorizedResult {
        let transactions = record.transactions.as_slice();
        if transactions.is_empty() {
            debug!("No transactions to categorize");
            return CategorizedResult {
                categorized_transactions: Vec::new(),
                raw_response: None,
            };
        }

        let payload = match serde_json::to_string_pretty(transactions) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "Could not serialize transactions, using keyword rules");
                return self.keyword_fallback(transactions, None);
            }
        };

        let prompt = prompts::categorization_prompt(&payload);
        let response = match self.ai.complete(&prompt).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Categorization backend failed, using keyword rules");
                return self.keyword_fallback(transactions, None);
            }
        };

        match parse_categorization(&response) {
            Ok(categories) if categories.len() == transactions.len() => {
                debug!(transactions = transactions.len(), "Applied AI categories");
                CategorizedResult {
                    categorized_transactions: merge_categories(transactions, &categories),
                    raw_response: None,
                }
            }
            Ok(categories) => {
                warn!(
                    expected = transactions.len(),
                    received = categories.len(),
                    "Category count mismatch, using keyword rules"
                );
                self.keyword_fallback(transactions, Some(response))
            }
            Err(err) => {
                warn!(error = %err, "Unusable categorization response, using keyword rules");
                self.keyword_fallback(transactions, Some(response))
            }
        }
    }

    fn keyword_fallback(
        &self,
        transactions: &[Transaction],
        raw_response: Option<String>,
    ) -> CategorizedResult {
        let categorized = transactions
            .iter()
            .map(|tx| {
                let mut tx = tx.clone();
                tx.category = Some(keyword_category(&tx.description).to_string());
                tx
            })
            .collect();

        CategorizedResult {
            categorized_transactions: categorized,
            raw_response,
        }
    }
}

fn merge_categories(transactions: &[Transaction], categories: &[String]) -> Vec<Transaction> {
    transactions
        .iter()
        .zip(categories)
        .map(|(tx, category)| {
            let mut tx = tx.clone();
            tx.category = Some(category.clone());
            tx
        })
        .collect()
}

fn keyword_category(description: &str) -> &'static str {
    let description = description.to_lowercase();
    if FOOD_KEYWORDS.iter().any(|k| description.contains(k)) {
        "Food & Dining"
    } else if TRANSPORT_KEYWORDS.iter().any(|k| description.contains(k)) {
        "Transportation"
    } else {
        "Other"
    }
}
