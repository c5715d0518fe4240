//! Editor stage: critiques and rewrites a draft.

use std::sync::Arc;

use tracing::warn;

use crate::client::ModelClient;
use crate::usage::UsageRecord;

use super::structured::{self, EditorReply};

/// Structured revision of a draft.
#[derive(Debug, Clone)]
pub struct Revision {
    /// Critique text, or a diagnostic string when the reply was unusable.
    pub critique: String,
    /// The revised post; exactly the input draft when revision failed.
    pub final_post: String,
    /// Usage reported for the editor call; empty when the call failed.
    pub usage: UsageRecord,
    /// Raw model output, kept for diagnostics.
    pub raw_output: String,
}

/// The revising stage.
///
/// Makes a single structured-output attempt — no retry loop. Every failure
/// mode (transport error, empty reply, malformed JSON) degrades to a
/// diagnostic critique with the original draft as the final post, so this
/// stage never fails and never loses a usable draft.
pub struct Editor {
    client: Arc<dyn ModelClient>,
}

impl Editor {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// Revise a draft.
    pub async fn revise(&self, draft: &str) -> Revision {
        let prompt = editor_prompt(draft);

        let output = match self.client.generate(&prompt).await {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, "editor model call failed, keeping original draft");
                return Revision {
                    critique: format!("Editor request failed: {err}. Keeping original draft."),
                    final_post: draft.to_string(),
                    usage: UsageRecord::empty(),
                    raw_output: String::new(),
                };
            }
        };

        let EditorReply {
            critique,
            final_post,
        } = structured::parse_editor_reply(&output.text, draft);

        Revision {
            critique,
            final_post,
            usage: output.usage,
            raw_output: output.text,
        }
    }
}

/// Fixed instructional prompt for the editor persona. The `critique` and
/// `final_post` key names are a wire contract with the model and must match
/// what the structured parser looks for.
fn editor_prompt(draft: &str) -> String {
    format!(
        "You are a strict editor. You hate generic buzzwords.\n\
         \n\
         You will receive a LinkedIn post draft.\n\
         Your tasks:\n\
         1) Briefly critique the draft (maximum 3 sentences).\n\
         2) Rewrite it to be sharper, more concrete, and more impactful.\n\
         \n\
         RESPONSE FORMAT (IMPORTANT):\n\
         - Respond ONLY in valid JSON.\n\
         - No additional text, no markdown, no explanations.\n\
         - Use exactly these keys: \"critique\" and \"final_post\".\n\
         \n\
         Example:\n\
         {{\n\
           \"critique\": \"The draft is too vague and uses generic language...\",\n\
           \"final_post\": \"Here is the revised, punchier version...\"\n\
         }}\n\
         \n\
         DRAFT:\n\
         \"\"\"{draft}\"\"\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::client::{ModelError, ModelOutput};

    struct ScriptedClient {
        script: Mutex<Vec<Result<ModelOutput, ModelError>>>,
    }

    impl ScriptedClient {
        fn new(script: Vec<Result<ModelOutput, ModelError>>) -> Self {
            Self {
                script: Mutex::new(script),
            }
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn generate(&self, _prompt: &str) -> Result<ModelOutput, ModelError> {
            let mut script = self.script.lock().expect("script lock");
            if script.is_empty() {
                return Ok(ModelOutput::empty());
            }
            script.remove(0)
        }
    }

    fn output_with_usage(text: &str, total: u64) -> ModelOutput {
        let mut usage = UsageRecord::empty();
        usage.insert("total_token_count", total);
        ModelOutput {
            text: text.to_string(),
            usage,
            raw: serde_json::Value::Null,
        }
    }

    const DRAFT: &str = "Remote work isn't dying, it's maturing.";

    #[tokio::test]
    async fn test_structured_reply_extracted() {
        let raw = r#"{"critique": "Fine.", "final_post": "Remote work isn't dying. It's maturing."}"#;
        let client = Arc::new(ScriptedClient::new(vec![Ok(output_with_usage(raw, 25))]));
        let editor = Editor::new(client);

        let revision = editor.revise(DRAFT).await;
        assert_eq!(revision.critique, "Fine.");
        assert_eq!(revision.final_post, "Remote work isn't dying. It's maturing.");
        assert_eq!(revision.usage.total_tokens(), 25);
        assert_eq!(revision.raw_output, raw);
    }

    #[tokio::test]
    async fn test_transport_error_degrades_to_draft() {
        let client = Arc::new(ScriptedClient::new(vec![Err(ModelError::Api {
            status: 503,
            message: "overloaded".into(),
        })]));
        let editor = Editor::new(client);

        let revision = editor.revise(DRAFT).await;
        assert_eq!(revision.final_post, DRAFT);
        assert!(revision.critique.starts_with("Editor request failed"));
        assert!(revision.usage.is_empty());
    }

    #[tokio::test]
    async fn test_empty_reply_degrades_to_draft() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(ModelOutput::empty())]));
        let editor = Editor::new(client);

        let revision = editor.revise(DRAFT).await;
        assert_eq!(revision.final_post, DRAFT);
        assert_eq!(revision.critique, structured::EMPTY_REPLY_CRITIQUE);
    }

    #[tokio::test]
    async fn test_usage_carried_even_when_parse_fails() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(output_with_usage(
            "not json at all",
            12,
        ))]));
        let editor = Editor::new(client);

        let revision = editor.revise(DRAFT).await;
        assert_eq!(revision.final_post, DRAFT);
        assert_eq!(revision.usage.total_tokens(), 12);
    }

    #[test]
    fn test_prompt_embeds_draft_and_contract_keys() {
        let prompt = editor_prompt(DRAFT);
        assert!(prompt.contains(DRAFT));
        assert!(prompt.contains("\"critique\""));
        assert!(prompt.contains("\"final_post\""));
    }
}
