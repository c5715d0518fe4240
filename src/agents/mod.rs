//! The two pipeline personas.
//!
//! - **Writer** ([`DraftWriter`]): turns a topic into a short draft, retrying
//!   transient failures and degrading to a fixed fallback string.
//! - **Editor** ([`Editor`]): critiques and rewrites a draft through a
//!   structured-output call, with a defensive parse layer that never loses
//!   the original draft.

mod editor;
mod structured;
mod writer;

pub use editor::{Editor, Revision};
pub use structured::{parse_editor_reply, EditorReply, EMPTY_REPLY_CRITIQUE};
pub use writer::{Draft, DraftWriter, FALLBACK_DRAFT};
