//! Two-stage LLM content pipeline.
//!
//! A **writer** stage drafts a short post from a topic; an **editor** stage
//! critiques and rewrites the draft through a structured-output call. Token
//! usage from both calls is reconciled across provider-specific field names,
//! priced, and the finished result is appended to a spreadsheet or a local
//! JSONL log.
//!
//! The interesting parts are deliberately defensive: model output is a
//! non-contractual format, so the editor's reply goes through a tolerance
//! layer (fence stripping, brace isolation, draft fallback) and usage
//! metadata goes through an ordered field-name probe. A usable draft is never
//! lost to a downstream failure.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use postforge::client::GeminiClient;
//! use postforge::pipeline::Pipeline;
//! use postforge::usage::TokenPrice;
//!
//! let client = Arc::new(GeminiClient::new("gemini-2.5-flash", api_key));
//! let pipeline = Pipeline::new(client, TokenPrice::default());
//! let result = pipeline.run("The future of AI agents in business").await?;
//! println!("{}", result.final_post);
//! ```

pub mod agents;
pub mod api;
pub mod client;
pub mod config;
pub mod pipeline;
pub mod sink;
pub mod usage;

pub use pipeline::{Pipeline, PipelineError, PipelineResult};
