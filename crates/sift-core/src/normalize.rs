//! Amount normalization for AI-structured statement data.
//!
//! Model responses carry amounts in whatever shape the statement used:
//! numbers, formatted strings ("1,500.00", "₮12,000"), or garbage. Every
//! amount and balance funnels through here before aggregation, so the
//! analyzer can assume plain finite `f64` values throughout.

use serde_json::Value;

/// Coerce an arbitrary JSON value into a finite `f64`.
///
/// Numbers pass through, strings are cleaned and parsed, and everything
/// else (null, bool, array, object) becomes `0.0`. Never fails.
pub fn normalize_amount(value: &Value) -> f64 {
    match value {
        Value::Number(n) => ensure_finite(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => normalize_amount_str(s),
        _ => 0.0,
    }
}

/// Parse an amount out of a formatted string.
///
/// Strips every character except digits, `.` and `-` (currency symbols,
/// thousands separators, stray words), then parses the remainder. Returns
/// `0.0` when nothing parseable is left.
pub fn normalize_amount_str(s: &str) -> f64 {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    ensure_finite(cleaned.parse().unwrap_or(0.0))
}

/// Clamp non-finite values to `0.0`.
///
/// A long enough digit run parses to infinity; downstream arithmetic
/// assumes finite inputs, so that case collapses to zero here.
pub fn ensure_finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
