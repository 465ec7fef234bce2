//! Feedback extraction: polymorphic AI content → one normalized string.
//!
//! AI backends reply with either a plain string or an ordered sequence of
//! typed parts; only `{type: "text"}` parts carry usable text. The shape
//! is modelled as the exhaustive [`MessageContent`] sum type rather than
//! runtime shape-poking, so the match below cannot silently miss a case
//! when the wire model grows.
//!
//! Extraction is total: any content yields a string, and the absence of
//! usable text yields `""` — whether that is a failure is the caller's
//! call (for the pipeline it surfaces later as a parse failure).

use crate::clients::{ContentPart, MessageContent};

/// Normalize AI message content to a single trimmed string.
///
/// * `Text` → the string, trimmed.
/// * `Parts` → the `text` of every part with `type == "text"`,
///   concatenated in original order with no separator, trimmed.
///   Non-text and malformed parts are skipped, order preserved.
/// * Anything else → `""`.
pub fn extract_text(content: &MessageContent) -> String {
    match content {
        MessageContent::Text(text) => text.trim().to_string(),
        MessageContent::Parts(parts) => parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Typed { kind, text } if kind == "text" => Some(text.as_str()),
                _ => None,
            })
            .collect::<String>()
            .trim()
            .to_string(),
        MessageContent::Other(_) => String::new(),
    }
}
