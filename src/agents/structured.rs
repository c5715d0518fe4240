//! Defensive extraction of structured editor output from free text.
//!
//! The editor prompt demands a bare JSON object, but model output is not a
//! contractual wire format: replies arrive wrapped in markdown fences,
//! surrounded by prose, truncated, or empty. This module is a tolerance
//! layer, not a parser — it cleans the text, isolates the outermost brace
//! pair, and degrades to the original draft on any failure. The one hard
//! invariant: the final post is never lost to a parse failure.

use serde_json::Value;

/// Critique shown when the editor model returns nothing at all.
pub const EMPTY_REPLY_CRITIQUE: &str =
    "Editor model returned an empty response. Keeping original draft.";

/// Structured result recovered from a raw editor reply.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorReply {
    /// The editor's critique; empty when the model supplied none, a
    /// diagnostic string when parsing failed.
    pub critique: String,
    /// The revised post. Either a non-empty model-supplied string or exactly
    /// the original draft — never empty, never a parse artifact.
    pub final_post: String,
}

/// Parse a raw editor reply, falling back to `draft` on any failure.
///
/// The algorithm, in order:
/// 1. Empty or whitespace-only input short-circuits to a sentinel critique
///    and the original draft; no JSON parsing is attempted.
/// 2. A leading fence marker line and a matching trailing fence are stripped.
/// 3. The candidate is the substring from the first `{` to the last `}`
///    inclusive, or the whole cleaned text if no such pair exists.
/// 4. The candidate is parsed as JSON. On success the `critique` and
///    `final_post` keys are read and trimmed, `final_post` falling back to
///    the draft when absent, null, or empty. On failure the critique becomes
///    a diagnostic embedding the parse error and the cleaned text.
pub fn parse_editor_reply(raw: &str, draft: &str) -> EditorReply {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return EditorReply {
            critique: EMPTY_REPLY_CRITIQUE.to_string(),
            final_post: draft.to_string(),
        };
    }

    let cleaned = strip_code_fences(cleaned);
    let candidate = isolate_json_block(cleaned);

    match serde_json::from_str::<Value>(candidate) {
        Ok(payload) => {
            let critique = string_field(&payload, "critique")
                .unwrap_or_default()
                .trim()
                .to_string();

            let final_post = string_field(&payload, "final_post")
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(draft)
                .to_string();

            EditorReply {
                critique,
                final_post,
            }
        }
        Err(err) => EditorReply {
            critique: format!("Failed to parse JSON from editor ({err}). Raw response: {cleaned}"),
            final_post: draft.to_string(),
        },
    }
}

/// Strip a markdown fence wrapper if present.
///
/// Removes a leading line that starts with ``` (with or without a language
/// tag) and a matching trailing ``` marker. Text without a leading fence
/// passes through untouched.
fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Drop the rest of the fence line (e.g. "json").
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => return text,
    };

    let body = body.trim_end();
    body.strip_suffix("```").map(str::trim_end).unwrap_or(body)
}

/// Isolate the outermost brace pair.
///
/// Returns the substring between the first `{` and the last `}` inclusive
/// when both exist in that order; otherwise the full input. This tolerates
/// prose before and after the JSON object without attempting real parsing.
fn isolate_json_block(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

/// Read a string-valued key, treating null and non-string values as absent.
fn string_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}
