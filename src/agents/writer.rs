//! Writer stage: drafts a post from a topic.

use std::sync::Arc;

use tracing::warn;

use crate::client::{ModelClient, ModelError};
use crate::usage::UsageRecord;

/// Total attempts before the writer gives up and returns the fallback draft.
const MAX_ATTEMPTS: u32 = 3;

/// Draft returned when every attempt failed or came back empty.
pub const FALLBACK_DRAFT: &str =
    "The writer failed to generate a draft for this topic. \
     Please try again later or adjust the prompt.";

/// A drafted post with the usage its generation consumed.
#[derive(Debug, Clone)]
pub struct Draft {
    /// The topic the draft was written for.
    pub topic: String,
    /// Trimmed draft text; the fallback string when generation failed.
    pub text: String,
    /// Usage reported for the successful attempt; empty on fallback.
    pub usage: UsageRecord,
}

/// The draft-producing stage.
///
/// Retries transient failures up to a fixed bound and degrades to a fallback
/// draft instead of erroring: a transport hiccup or an empty completion never
/// escapes this stage. The only error that propagates is a non-retryable one
/// (bad credentials, unknown model), where retrying would just repeat the
/// same failure.
pub struct DraftWriter {
    client: Arc<dyn ModelClient>,
}

impl DraftWriter {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// Produce a draft for the topic.
    pub async fn produce(&self, topic: &str) -> Result<Draft, ModelError> {
        let prompt = writer_prompt(topic);
        let mut last_error: Option<ModelError> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.client.generate(&prompt).await {
                Ok(output) => {
                    let text = output.text.trim();
                    if !text.is_empty() {
                        return Ok(Draft {
                            topic: topic.to_string(),
                            text: text.to_string(),
                            usage: output.usage,
                        });
                    }
                    warn!(attempt, topic, "writer got empty text from model");
                }
                Err(err) if err.is_retryable() => {
                    warn!(attempt, topic, error = %err, "writer model call failed");
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        if let Some(err) = last_error {
            warn!(topic, error = %err, "writer giving up after repeated errors");
        }

        Ok(Draft {
            topic: topic.to_string(),
            text: FALLBACK_DRAFT.to_string(),
            usage: UsageRecord::empty(),
        })
    }
}

/// Fixed instructional prompt for the writer persona. The constraints are
/// instructions to the model, not mechanically validated.
fn writer_prompt(topic: &str) -> String {
    format!(
        "You are a professional LinkedIn copywriter.\n\
         \n\
         Write a short LinkedIn post based on the topic below.\n\
         \n\
         Requirements:\n\
         - maximum 5 sentences\n\
         - no emojis\n\
         - no hashtags\n\
         - avoid generic buzzwords\n\
         - be specific and concrete\n\
         - write in a natural, conversational tone\n\
         \n\
         Topic: \"{topic}\""
    )
}
