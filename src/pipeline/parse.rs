//! Feedback parsing: recover a JSON object from noisy AI response text.
//!
//! AI responses frequently wrap valid JSON in prose ("Here is your
//! feedback: { … } Let me know…") despite instructions to the contrary.
//! The two-tier strategy below — strict parse first, then a greedy
//! first-`{`-to-last-`}` span — is resilient to that without attempting a
//! full tolerant-JSON grammar.
//!
//! Known limitation, accepted deliberately: the greedy span can stretch
//! across multiple independent JSON-like fragments, or swallow non-JSON
//! text between two legitimate braces. In both cases the span then fails
//! the strict parse and the caller gets [`ParseError::NotJson`] instead
//! of wrong data, which is the failure mode we want.

use crate::error::ParseError;
use crate::record::StructuredFeedback;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Greedy brace span: first `{` to last `}`, newlines included.
static RE_JSON_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Recover a structured feedback object from response text.
///
/// 1. Trim; empty input fails with [`ParseError::EmptyInput`].
/// 2. Strict JSON parse of the whole trimmed text; accept if it yields an
///    object.
/// 3. Otherwise parse the greedy `{…}` span, if any.
/// 4. Otherwise fail with [`ParseError::NotJson`].
///
/// "Object" is enforced strictly at each parse: a bare number, string,
/// or array is never accepted as feedback itself, though the span
/// recovery may still find an object embedded inside one.
pub fn parse_feedback(text: &str) -> Result<StructuredFeedback, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    if let Some(obj) = parse_object(trimmed) {
        return Ok(obj);
    }

    RE_JSON_SPAN
        .find(trimmed)
        .and_then(|span| parse_object(span.as_str()))
        .ok_or(ParseError::NotJson)
}

/// Strict parse accepting only a top-level JSON object.
fn parse_object(s: &str) -> Option<StructuredFeedback> {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}
