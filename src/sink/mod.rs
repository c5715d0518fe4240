//! Persistence collaborator for finished pipeline runs.
//!
//! Each completed run produces one [`PostRow`]; rows are independent,
//! order-insensitive appends, so sinks need no locking or read-modify-write.
//! Sink failures are always non-fatal at the orchestration boundary.

mod jsonl;
mod sheets;

pub use jsonl::JsonlSink;
pub use sheets::SheetsSink;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One persisted row.
///
/// Columns: Timestamp | Topic | Draft | Final Post | Total Tokens | Cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRow {
    /// When the pipeline run finished.
    pub timestamp: DateTime<Utc>,
    pub topic: String,
    pub draft: String,
    pub final_post: String,
    pub total_tokens: u64,
    pub cost: f64,
}

impl PostRow {
    /// Build a row stamped with the current time.
    pub fn new(
        topic: impl Into<String>,
        draft: impl Into<String>,
        final_post: impl Into<String>,
        total_tokens: u64,
        cost: f64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            topic: topic.into(),
            draft: draft.into(),
            final_post: final_post.into(),
            total_tokens,
            cost,
        }
    }
}

/// Errors from row persistence.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sink request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage API answered with a non-success status (authorization,
    /// connectivity, spreadsheet not found).
    #[error("sink API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A destination for finished rows.
#[async_trait]
pub trait PostSink: Send + Sync {
    /// Append one row. Callers treat all failures as non-fatal and log them.
    async fn append(&self, row: &PostRow) -> Result<(), SinkError>;
}
