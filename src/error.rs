//! Error types for the resumind-pipeline library.
//!
//! Two distinct error types reflect two distinct failure scopes:
//!
//! * [`AnalysisError`] — any failure that terminates a pipeline run. The
//!   orchestrator converts every one of these into a single terminal
//!   `Failed(message)` state; the `Display` output of each variant is the
//!   exact message surfaced to the user through the status signal.
//!
//! * [`ParseError`] — the feedback parser could not recover a JSON object
//!   from the AI response text. Kept separate so the parser can be used
//!   and tested on its own; it folds into [`AnalysisError::Parse`] at the
//!   pipeline boundary.
//!
//! There is no retryable/non-retryable split here: the pipeline never
//! retries, so every error is terminal for its run.

use thiserror::Error;

/// All failures that can terminate a pipeline run.
///
/// `Display` strings double as the user-facing status message (prefixed
/// with `"Error: "` by the status signal), so they are worded for humans,
/// not for logs.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The document store returned no locator for the raw résumé PDF.
    #[error("Failed to upload file")]
    ResumeUploadFailed,

    /// The document store returned no locator for the rasterized image.
    #[error("Failed to upload Image")]
    ImageUploadFailed,

    /// The rasterizer produced no image for page 1 of the PDF.
    ///
    /// `detail` carries the rasterizer's human-readable diagnosis when it
    /// has one (corrupt PDF, missing pdfium library, encode failure).
    #[error("Failed to convert pdf to image{}", .detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    ConversionFailed { detail: Option<String> },

    /// The AI backend returned no usable response.
    #[error("Failed to analyse Resume")]
    AnalysisFailed,

    /// The AI responded, but no structured feedback could be recovered.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all for unexpected collaborator errors (store I/O, record
    /// serialization, transport failures from the AI client).
    #[error("{0}")]
    Internal(String),
}

impl AnalysisError {
    /// The message carried into the terminal `Failed` state.
    ///
    /// Falls back to `"Unknown error"` when an error carries no text at
    /// all, so the user never sees an empty status line.
    pub fn failure_message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            msg
        }
    }
}

/// The feedback parser found no JSON object in the response text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The response text was empty (or whitespace only) after trimming.
    #[error("empty input")]
    EmptyInput,

    /// Neither the full text nor any `{…}` span inside it parsed as a
    /// JSON object.
    #[error("not JSON")]
    NotJson,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_failure_without_detail() {
        let e = AnalysisError::ConversionFailed { detail: None };
        assert_eq!(e.to_string(), "Failed to convert pdf to image");
    }

    #[test]
    fn conversion_failure_with_detail() {
        let e = AnalysisError::ConversionFailed {
            detail: Some("corrupt".into()),
        };
        assert_eq!(e.to_string(), "Failed to convert pdf to image (corrupt)");
    }

    #[test]
    fn upload_messages_match_status_literals() {
        assert_eq!(
            AnalysisError::ResumeUploadFailed.to_string(),
            "Failed to upload file"
        );
        assert_eq!(
            AnalysisError::ImageUploadFailed.to_string(),
            "Failed to upload Image"
        );
        assert_eq!(
            AnalysisError::AnalysisFailed.to_string(),
            "Failed to analyse Resume"
        );
    }

    #[test]
    fn parse_error_forwards_through_analysis_error() {
        let e = AnalysisError::from(ParseError::NotJson);
        assert_eq!(e.to_string(), "not JSON");
        let e = AnalysisError::from(ParseError::EmptyInput);
        assert_eq!(e.to_string(), "empty input");
    }

    #[test]
    fn empty_internal_message_falls_back_to_unknown() {
        let e = AnalysisError::Internal(String::new());
        assert_eq!(e.failure_message(), "Unknown error");
        let e = AnalysisError::Internal("socket closed".into());
        assert_eq!(e.failure_message(), "socket closed");
    }
}
