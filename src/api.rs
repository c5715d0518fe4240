//! HTTP surface.
//!
//! One operation: `POST /generate-post` runs the full pipeline for a topic.
//! A propagated model-transport failure maps to 502 Bad Gateway; persistence
//! failures never affect the response.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::pipeline::{Pipeline, PipelineError, PipelineResult};

/// Incoming payload with a single topic field.
#[derive(Debug, Deserialize)]
pub struct TopicRequest {
    pub topic: String,
}

/// Structured response for the generated and edited post.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub topic: String,
    pub draft: String,
    pub critique: String,
    pub final_post: String,
    pub total_tokens: u64,
    pub cost: f64,
}

impl From<PipelineResult> for PostResponse {
    fn from(result: PipelineResult) -> Self {
        Self {
            topic: result.topic,
            draft: result.draft,
            critique: result.critique,
            final_post: result.final_post,
            total_tokens: result.total_tokens,
            cost: result.cost,
        }
    }
}

/// Error body returned to API clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

struct ApiError(PipelineError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Upstream model failure: the gateway is fine, the model is not.
        let body = ErrorBody {
            detail: format!("model API failed during content generation: {}", self.0),
        };
        (StatusCode::BAD_GATEWAY, Json(body)).into_response()
    }
}

/// Build the application router.
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/generate-post", post(generate_post))
        .route("/health", get(health))
        .with_state(pipeline)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn generate_post(
    State(pipeline): State<Arc<Pipeline>>,
    Json(payload): Json<TopicRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let result = pipeline.run(&payload.topic).await.map_err(ApiError)?;
    Ok(Json(result.into()))
}

async fn health() -> StatusCode {
    StatusCode::OK
}
