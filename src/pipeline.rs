//! Pipeline orchestration: writer → editor → reconcile → persist.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::agents::{DraftWriter, Editor};
use crate::client::{ModelClient, ModelError};
use crate::sink::{PostRow, PostSink};
use crate::usage::{combined_total, TokenPrice};

/// Errors that escape a pipeline run.
///
/// The only failure that propagates is an unrecoverable transport error from
/// the writer's model call; every other failure mode (empty output, parse
/// failure, editor transport error, sink failure) degrades into diagnostic
/// text inside the result.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("content generation failed: {0}")]
    Upstream(#[from] ModelError),
}

/// The finished, external-facing result of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub topic: String,
    pub draft: String,
    pub critique: String,
    pub final_post: String,
    pub total_tokens: u64,
    pub cost: f64,
}

/// One writer-then-editor pass over a topic.
///
/// Strictly sequential: each stage consumes the previous stage's output.
/// Concurrent runs share nothing mutable — collaborators are `Arc`-shared
/// immutable handles and every run owns its own intermediate values.
pub struct Pipeline {
    writer: DraftWriter,
    editor: Editor,
    price: TokenPrice,
    sink: Option<Arc<dyn PostSink>>,
}

impl Pipeline {
    /// Build a pipeline around a model client.
    pub fn new(client: Arc<dyn ModelClient>, price: TokenPrice) -> Self {
        Self {
            writer: DraftWriter::new(client.clone()),
            editor: Editor::new(client),
            price,
            sink: None,
        }
    }

    /// Attach a persistence sink. Sink failures are logged and swallowed.
    pub fn with_sink(mut self, sink: Arc<dyn PostSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Run the full pipeline for one topic.
    pub async fn run(&self, topic: &str) -> Result<PipelineResult, PipelineError> {
        let draft = self.writer.produce(topic).await?;
        let revision = self.editor.revise(&draft.text).await;

        let total_tokens = combined_total(&draft.usage, &revision.usage);
        let cost = self.price.cost(total_tokens);

        let result = PipelineResult {
            topic: topic.to_string(),
            draft: draft.text,
            critique: revision.critique,
            final_post: revision.final_post,
            total_tokens,
            cost,
        };

        info!(topic, total_tokens, cost, "pipeline run complete");

        if let Some(sink) = &self.sink {
            let row = PostRow::new(
                &result.topic,
                &result.draft,
                &result.final_post,
                result.total_tokens,
                result.cost,
            );
            if let Err(err) = sink.append(&row).await {
                // Persistence is best-effort; the result is returned regardless.
                warn!(topic, error = %err, "failed to persist pipeline result");
            }
        }

        Ok(result)
    }
}
