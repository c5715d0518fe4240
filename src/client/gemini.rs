//! Gemini REST client.
//!
//! Thin wrapper over the `models/{model}:generateContent` endpoint. Response
//! handling is deliberately tolerant: text is collected across all candidate
//! parts, usage metadata is filtered down to token-ish numeric fields, and a
//! missing total is computed from whatever token counts did arrive.

use serde_json::{Map, Value};
use tracing::debug;

use super::{ModelClient, ModelError, ModelOutput};
use crate::usage::{UsageRecord, WordCountEstimator};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// HTTP client for the Gemini generateContent API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    max_output_tokens: u32,
    estimator: WordCountEstimator,
}

impl GeminiClient {
    /// Create a client for the given model and API key.
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            estimator: WordCountEstimator,
        }
    }

    /// Override the API base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request output token cap.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        // Accept both "gemini-2.5-flash" and "models/gemini-2.5-flash".
        let model = self.model.strip_prefix("models/").unwrap_or(&self.model);
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait::async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<ModelOutput, ModelError> {
        let body = serde_json::json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {"maxOutputTokens": self.max_output_tokens},
        });

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let raw: Value = serde_json::from_str(&body)?;
        let text = extract_text(&raw);
        let mut usage = extract_usage(&raw);

        if text.is_empty() {
            debug!(raw = %raw, "empty text extracted from model response");
            return Ok(ModelOutput { text, usage, raw });
        }

        // No usage reported at all: estimate from word counts so the cost
        // reconciler has something to work with.
        if usage.is_empty() {
            usage = self.estimator.estimate_call(prompt, &text);
        }

        Ok(ModelOutput { text, usage, raw })
    }
}

/// Collect all text parts across response candidates.
///
/// Candidates, content, and parts may each be absent; anything missing just
/// contributes nothing.
fn extract_text(raw: &Value) -> String {
    let mut parts_text = Vec::new();

    let candidates = raw
        .get("candidates")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    for candidate in candidates {
        let parts = candidate
            .pointer("/content/parts")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for part in parts {
            if let Some(text) = part.get("text").and_then(Value::as_str) {
                if !text.is_empty() {
                    parts_text.push(text);
                }
            }
        }
    }

    parts_text.join("\n").trim().to_string()
}

/// Extract token-related usage fields from `usageMetadata`.
///
/// Keeps only numeric fields whose name mentions tokens, normalized to
/// snake_case so field naming is stable across API surface versions. When no
/// total-candidate field survives, a `total_token_count` is computed from the
/// kept fields.
fn extract_usage(raw: &Value) -> UsageRecord {
    let Some(metadata) = raw.get("usageMetadata").and_then(Value::as_object) else {
        return UsageRecord::empty();
    };

    let mut fields = Map::new();
    for (name, value) in metadata {
        let Some(count) = value.as_u64().or_else(|| value.as_f64().map(|f| f as u64)) else {
            continue;
        };
        let name = to_snake_case(name);
        if name.contains("token") {
            fields.insert(name, Value::from(count));
        }
    }

    if !fields.contains_key("total_token_count") {
        let total: u64 = fields.values().filter_map(Value::as_u64).sum();
        if total > 0 {
            fields.insert("total_token_count".to_string(), Value::from(total));
        }
    }

    UsageRecord::from_fields(fields)
}

/// Convert a camelCase field name to snake_case. Already-snake_case names
/// pass through unchanged.
fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
