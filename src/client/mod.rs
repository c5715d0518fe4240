//! Model call collaborator boundary.
//!
//! The pipeline stages talk to the model through the [`ModelClient`] trait so
//! the transport can be swapped out (real Gemini REST client in production,
//! scripted mocks in tests). The client is constructed explicitly and passed
//! in; there is no process-wide lazily-configured handle.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::usage::UsageRecord;

/// Errors from the model transport.
///
/// Empty output is never an error: an empty string is a valid, non-error
/// result and the caller decides how to fall back.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Network-level failure (DNS, connect, timeout, TLS).
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("model API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not valid JSON.
    #[error("malformed model response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ModelError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Network failures and server-side errors (5xx, 429) are transient;
    /// auth and model-not-found errors (other 4xx) are not and propagate
    /// immediately instead of burning retry attempts.
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Http(_) => true,
            ModelError::Api { status, .. } => *status >= 500 || *status == 429,
            ModelError::Decode(_) => false,
        }
    }
}

/// One model call's worth of output.
#[derive(Debug, Clone)]
pub struct ModelOutput {
    /// Concatenated text of the response (may be empty).
    pub text: String,
    /// Usage metadata as reported by the provider, possibly estimated.
    pub usage: UsageRecord,
    /// Raw response body, kept for diagnostics.
    pub raw: Value,
}

impl ModelOutput {
    /// An output with no text and no usage, for degraded paths.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            usage: UsageRecord::empty(),
            raw: Value::Null,
        }
    }
}

/// A text-generation backend.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Run one generation request.
    ///
    /// Fails only on transport/API problems; an empty completion is returned
    /// as an empty `text`, not an error.
    async fn generate(&self, prompt: &str) -> Result<ModelOutput, ModelError>;
}
