//! Word-count token estimation.
//!
//! Some provider responses omit usage metadata entirely. Rather than report
//! zero tokens for a call that plainly consumed some, the client falls back to
//! a rough whitespace word count (1 word ≈ 1 token) and marks the record as
//! estimated so downstream consumers can tell it apart from reported usage.

use serde_json::json;

use super::UsageRecord;

/// Estimates token usage from prompt and completion text.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCountEstimator;

impl WordCountEstimator {
    /// Estimate tokens for a single piece of text.
    pub fn estimate(&self, text: &str) -> u64 {
        text.split_whitespace().count() as u64
    }

    /// Build an estimated usage record for a prompt/completion pair.
    ///
    /// The record mirrors the provider's own field naming so the reconciler
    /// treats it identically to reported usage, with an `estimated` marker
    /// for diagnostics.
    pub fn estimate_call(&self, prompt: &str, completion: &str) -> UsageRecord {
        let prompt_tokens = self.estimate(prompt);
        let completion_tokens = self.estimate(completion);

        let mut usage = UsageRecord::empty();
        usage.insert("prompt_token_count", prompt_tokens);
        usage.insert("candidates_token_count", completion_tokens);
        usage.insert("total_token_count", prompt_tokens + completion_tokens);
        usage.insert("estimated", json!(true));
        usage
    }
}
