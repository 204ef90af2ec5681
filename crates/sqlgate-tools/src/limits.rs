//! Row-limit argument handling.

use serde_json::Value;

/// Rows fetched when the caller gives no usable limit.
pub const DEFAULT_MAX_FETCHED_ROWS: u64 = 100;

/// Turn the `max_fetched_rows` argument into a row cap.
///
/// Strings count only when every character is an ASCII digit; anything else
/// falls back to [`DEFAULT_MAX_FETCHED_ROWS`]. Non-negative numbers are taken
/// as-is, with fractions truncated.
pub fn coerce_row_limit(raw: Option<&Value>) -> u64 {
    match raw {
        Some(Value::String(s)) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().unwrap_or(DEFAULT_MAX_FETCHED_ROWS)
        }
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64)
                    .map(|f| f.trunc() as u64)
            })
            .unwrap_or(DEFAULT_MAX_FETCHED_ROWS),
        _ => DEFAULT_MAX_FETCHED_ROWS,
    }
}
