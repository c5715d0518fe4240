//! Token usage records and cost reconciliation.
//!
//! Model providers report usage metadata under different field names depending
//! on the client library version in play:
//!
//! - **New SDK**: `{"total_token_count": N}`
//! - **Legacy camelCase**: `{"totalTokens": N}`
//! - **Legacy snake_case**: `{"total_tokens": N}`
//!
//! This module isolates that instability from the rest of the pipeline: a
//! [`UsageRecord`] carries the raw fields as reported, and the total is
//! recovered by probing a fixed, ordered list of candidate field names.

mod estimator;
mod price;

pub use estimator::WordCountEstimator;
pub use price::TokenPrice;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Candidate field names for the "total tokens consumed" metric, in priority
/// order. The first field that is present with a numeric value wins; a record
/// with `total_token_count` present never falls through to `totalTokens`.
const TOTAL_TOKEN_FIELDS: [&str; 3] = ["total_token_count", "totalTokens", "total_tokens"];

/// Per-call usage metadata as reported by a model provider.
///
/// Field names are provider-specific and not normalized on ingest; callers
/// recover totals through [`UsageRecord::total_tokens`]. Non-numeric metadata
/// (e.g. an `"estimated": true` marker) rides along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageRecord(Map<String, Value>);

impl UsageRecord {
    /// Create an empty usage record.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a record from raw provider fields.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Insert a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a raw field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether the record carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recover the total token count for this record.
    ///
    /// Probes [`TOTAL_TOKEN_FIELDS`] in order and returns the first present,
    /// numeric value coerced to an integer. A `null` or non-numeric value
    /// counts as absent and the next candidate is tried. Returns 0 when no
    /// candidate matches, so an empty or malformed record contributes nothing
    /// rather than poisoning the sum.
    pub fn total_tokens(&self) -> u64 {
        for field in TOTAL_TOKEN_FIELDS {
            if let Some(total) = self.0.get(field).and_then(as_token_count) {
                return total;
            }
        }
        0
    }

    /// Iterate over the raw fields.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Coerce a JSON value to a token count.
///
/// Accepts integers directly and truncates floats (providers occasionally
/// report counts as floating point). Negative or non-numeric values are
/// treated as absent.
fn as_token_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.is_finite() => Some(f as u64),
        _ => None,
    }
}

/// Sum the total token counts of the writer and editor usage records.
///
/// Each record contributes its own probed total; missing or unparseable
/// records contribute 0. The result is always a plain non-negative integer.
pub fn combined_total(writer: &UsageRecord, editor: &UsageRecord) -> u64 {
    writer.total_tokens() + editor.total_tokens()
}
