//! End-to-end pipeline flow against scripted collaborators.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use postforge::agents::FALLBACK_DRAFT;
use postforge::client::{ModelClient, ModelError, ModelOutput};
use postforge::pipeline::Pipeline;
use postforge::sink::{PostRow, PostSink, SinkError};
use postforge::usage::{TokenPrice, UsageRecord};

/// Model client that answers the writer and editor prompts differently,
/// keyed on prompt content.
struct TwoStageClient {
    draft_reply: Result<ModelOutput, ModelError>,
    editor_reply: Result<ModelOutput, ModelError>,
}

impl TwoStageClient {
    fn new(draft: ModelOutput, editor: ModelOutput) -> Self {
        Self {
            draft_reply: Ok(draft),
            editor_reply: Ok(editor),
        }
    }
}

#[async_trait]
impl ModelClient for TwoStageClient {
    async fn generate(&self, prompt: &str) -> Result<ModelOutput, ModelError> {
        let reply = if prompt.contains("strict editor") {
            &self.editor_reply
        } else {
            &self.draft_reply
        };
        match reply {
            Ok(output) => Ok(output.clone()),
            Err(ModelError::Api { status, message }) => Err(ModelError::Api {
                status: *status,
                message: message.clone(),
            }),
            Err(_) => unreachable!("scripted errors are Api variants"),
        }
    }
}

fn output(text: &str, usage_field: &str, total: u64) -> ModelOutput {
    let mut usage = UsageRecord::empty();
    usage.insert(usage_field, total);
    ModelOutput {
        text: text.to_string(),
        usage,
        raw: Value::Null,
    }
}

/// Sink that records rows, optionally failing every append.
#[derive(Default)]
struct RecordingSink {
    rows: Mutex<Vec<PostRow>>,
    fail: bool,
    attempts: AtomicU32,
}

#[async_trait]
impl PostSink for RecordingSink {
    async fn append(&self, row: &PostRow) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SinkError::Api {
                status: 403,
                message: "spreadsheet access denied".into(),
            });
        }
        self.rows.lock().expect("rows lock").push(row.clone());
        Ok(())
    }
}

#[tokio::test]
async fn test_full_run_remote_work_scenario() {
    let draft = output(
        "Remote work isn't dying, it's maturing.",
        "total_token_count",
        10,
    );
    let editor = output(
        r#"{"critique": "Fine.", "final_post": "Remote work isn't dying. It's maturing."}"#,
        "totalTokens",
        5,
    );

    let client = Arc::new(TwoStageClient::new(draft, editor));
    let sink = Arc::new(RecordingSink::default());
    let pipeline =
        Pipeline::new(client, TokenPrice::new(0.000002)).with_sink(sink.clone());

    let result = pipeline.run("remote work").await.expect("pipeline result");

    assert_eq!(result.topic, "remote work");
    assert_eq!(result.draft, "Remote work isn't dying, it's maturing.");
    assert_eq!(result.critique, "Fine.");
    assert_eq!(result.final_post, "Remote work isn't dying. It's maturing.");
    // Field-name reconciliation across the two heterogeneous records.
    assert_eq!(result.total_tokens, 15);
    assert!((result.cost - 15.0 * 0.000002).abs() < 1e-12);

    let rows = sink.rows.lock().expect("rows lock");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].final_post, result.final_post);
    assert_eq!(rows[0].total_tokens, 15);
}

#[tokio::test]
async fn test_sink_failure_does_not_affect_result() {
    let draft = output("A solid draft.", "total_token_count", 8);
    let editor = output(
        r#"{"critique": "Good.", "final_post": "A polished draft."}"#,
        "total_token_count",
        4,
    );

    let client = Arc::new(TwoStageClient::new(draft, editor));
    let sink = Arc::new(RecordingSink {
        fail: true,
        ..RecordingSink::default()
    });
    let pipeline = Pipeline::new(client, TokenPrice::default()).with_sink(sink.clone());

    let result = pipeline.run("resilience").await.expect("pipeline result");

    assert_eq!(result.final_post, "A polished draft.");
    assert_eq!(result.total_tokens, 12);
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);
    assert!(sink.rows.lock().expect("rows lock").is_empty());
}

#[tokio::test]
async fn test_editor_garbage_keeps_draft() {
    let draft = output("Keep me around.", "total_token_count", 6);
    let editor = output("``` not even json ```", "total_token_count", 2);

    let client = Arc::new(TwoStageClient::new(draft, editor));
    let pipeline = Pipeline::new(client, TokenPrice::default());

    let result = pipeline.run("parse failure").await.expect("pipeline result");

    assert_eq!(result.final_post, "Keep me around.");
    assert!(result.critique.starts_with("Failed to parse JSON from editor"));
    assert_eq!(result.total_tokens, 8);
}

#[tokio::test]
async fn test_editor_transport_failure_is_absorbed() {
    let draft = output("Still standing.", "total_token_count", 7);
    let client = Arc::new(TwoStageClient {
        draft_reply: Ok(draft),
        editor_reply: Err(ModelError::Api {
            status: 500,
            message: "editor down".into(),
        }),
    });
    let pipeline = Pipeline::new(client, TokenPrice::default());

    let result = pipeline.run("editor outage").await.expect("pipeline result");

    assert_eq!(result.final_post, "Still standing.");
    assert!(result.critique.starts_with("Editor request failed"));
    assert_eq!(result.total_tokens, 7);
}

#[tokio::test]
async fn test_writer_auth_failure_propagates() {
    let client = Arc::new(TwoStageClient {
        draft_reply: Err(ModelError::Api {
            status: 401,
            message: "invalid key".into(),
        }),
        editor_reply: Ok(output("unused", "total_token_count", 0)),
    });
    let pipeline = Pipeline::new(client, TokenPrice::default());

    let err = pipeline.run("auth").await.expect_err("should fail");
    assert!(err.to_string().contains("content generation failed"));
}

#[tokio::test]
async fn test_empty_model_degrades_to_fallback_and_zero_cost() {
    let client = Arc::new(TwoStageClient::new(ModelOutput::empty(), ModelOutput::empty()));
    let pipeline = Pipeline::new(client, TokenPrice::default());

    let result = pipeline.run("silence").await.expect("pipeline result");

    assert_eq!(result.draft, FALLBACK_DRAFT);
    assert_eq!(result.final_post, FALLBACK_DRAFT);
    assert_eq!(result.total_tokens, 0);
    assert_eq!(result.cost, 0.0);
}
