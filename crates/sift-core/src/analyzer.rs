//! Rule-based financial analysis
//!
//! Third pipeline stage: deterministic aggregation over a structured
//! statement. Pure computation, no AI involvement; given the same record
//! it always produces the same report.
//!
//! Sign convention: negative amounts are withdrawals, positive amounts are
//! deposits, zero amounts are neither (they still show up in transaction
//! counts and date buckets).

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{
    AnalysisReport, CashFlowAnalysis, MonthEntry, SpendingInsights, StatementRecord, Transaction,
};
use crate::normalize::ensure_finite;

/// Spending keyword table, first match wins.
///
/// This taxonomy is internal to the analyzer and deliberately separate from
/// the classifier's label set. Keywords are lowercase; matching is
/// case-insensitive substring containment over the description.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("income", &["цалин", "хуримтлал", "salary", "deposit"]),
    (
        "food",
        &["ресторан", "кафе", "хоол", "хүнсний дэлгүүр", "restaurant", "grocery"],
    ),
    ("transport", &["бензин", "такси", "автобус", "тээвэр"]),
    ("loan", &["зээл", "зээлийн эргэн төлөлт", "loan", "credit"]),
];

/// Bucket used when spending matches no keyword.
const OTHER_CATEGORY: &str = "other";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Transaction amount with the non-finite guard applied.
///
/// Records built in code can carry NaN or infinity; deserialized ones
/// cannot. Reading through this keeps the arithmetic total either way.
fn amount(tx: &Transaction) -> f64 {
    ensure_finite(tx.amount)
}

/// Rule-based statement analyzer
#[derive(Debug, Clone, Default)]
pub struct FinancialAnalyzer;

impl FinancialAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a structured statement into the full report
    pub fn analyze(&self, record: &StatementRecord) -> AnalysisReport {
        let transactions = &record.transactions;
        debug!(transactions = transactions.len(), "Analyzing statement");

        AnalysisReport {
            total_transactions: transactions.len(),
            spending_insights: self.spending_insights(transactions),
            monthly_summary: self.monthly_summary(transactions),
            top_categories: self.categorize_spending(transactions),
            cash_flow_analysis: self.cash_flow(transactions),
        }
    }

    /// Totals over the withdrawal/deposit partition. Zero amounts belong to
    /// neither side. Empty input yields the all-zero insights.
    fn spending_insights(&self, transactions: &[Transaction]) -> SpendingInsights {
        let withdrawal_count = transactions.iter().filter(|t| amount(t) < 0.0).count();
        let deposit_count = transactions.iter().filter(|t| amount(t) > 0.0).count();

        let total_spent: f64 = transactions
            .iter()
            .map(amount)
            .filter(|a| *a < 0.0)
            .sum::<f64>()
            .abs();
        let total_earned: f64 = transactions
            .iter()
            .map(amount)
            .filter(|a| *a > 0.0)
            .sum();

        let average_transaction = if withdrawal_count > 0 {
            total_spent / withdrawal_count as f64
        } else {
            0.0
        };

        SpendingInsights {
            total_spent,
            total_earned,
            net_flow: total_earned - total_spent,
            average_transaction,
            withdrawal_count,
            deposit_count,
        }
    }

    /// Per-month spent/earned buckets keyed by the first seven characters
    /// of the date (YYYY-MM for well-formed dates). Short dates group under
    /// "Unknown". Every transaction touches its bucket, zero amounts
    /// included.
    fn monthly_summary(&self, transactions: &[Transaction]) -> BTreeMap<String, MonthEntry> {
        let mut monthly: BTreeMap<String, MonthEntry> = BTreeMap::new();

        for tx in transactions {
            let month = if tx.date.chars().count() >= 7 {
                tx.date.chars().take(7).collect()
            } else {
                "Unknown".to_string()
            };

            let entry = monthly.entry(month).or_default();
            let value = amount(tx);
            if value < 0.0 {
                entry.spent += value.abs();
            } else {
                entry.earned += value;
            }
        }

        monthly
    }

    /// Keyword-bucketed spending totals. Only withdrawals count; the first
    /// matching category in table order wins; everything unmatched lands in
    /// "other". Zero totals are omitted from the result.
    fn categorize_spending(&self, transactions: &[Transaction]) -> BTreeMap<String, f64> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

        for tx in transactions {
            let value = amount(tx);
            if value >= 0.0 {
                continue;
            }

            let description = tx.description.to_lowercase();
            let category = CATEGORY_KEYWORDS
                .iter()
                .find(|(_, keywords)| keywords.iter().any(|k| description.contains(k)))
                .map(|(name, _)| *name)
                .unwrap_or(OTHER_CATEGORY);

            *totals.entry(category).or_insert(0.0) += value.abs();
        }

        totals
            .into_iter()
            .map(|(category, total)| (category.to_string(), round2(total)))
            .filter(|(_, total)| *total > 0.0)
            .collect()
    }

    /// Signed flow per literal date string, with mean and sign counts over
    /// the per-date sums.
    fn cash_flow(&self, transactions: &[Transaction]) -> CashFlowAnalysis {
        let mut daily: BTreeMap<String, f64> = BTreeMap::new();

        for tx in transactions {
            *daily.entry(tx.date.clone()).or_insert(0.0) += amount(tx);
        }

        let average = if daily.is_empty() {
            0.0
        } else {
            daily.values().sum::<f64>() / daily.len() as f64
        };

        CashFlowAnalysis {
            average_daily_flow: round2(average),
            days_with_positive_flow: daily.values().filter(|f| **f > 0.0).count(),
            days_with_negative_flow: daily.values().filter(|f| **f < 0.0).count(),
            daily_cash_flow: daily,
        }
    }
}
