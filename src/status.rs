//! Pipeline states and the status-observer trait.
//!
//! The orchestrator advances through an explicit enumerated state per
//! submission; every transition synchronously notifies an injected
//! [`Arc<dyn StatusObserver>`] (configured via
//! [`crate::config::AnalysisConfigBuilder::status_observer`]) with the
//! new state and its display text.
//!
//! # Why a callback instead of a channel?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward transitions to a Tokio broadcast channel, a WebSocket, a
//! terminal spinner, or a UI signal — without the library knowing anything
//! about how the host application communicates. The trait is `Send + Sync`
//! so an observer can be shared across concurrently running submissions
//! (each run is independent; a single run never notifies concurrently).

use std::sync::Arc;

/// The state of one submission's pipeline run.
///
/// States advance strictly forward; `Failed` is terminal and reachable
/// from every non-terminal state. The machine is an explicit enum plus a
/// transition method on the orchestrator rather than ad hoc flags, so
/// each transition and guard is unit-testable in isolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    /// No submission in flight.
    Idle,
    /// Uploading the raw résumé PDF to the document store.
    Uploading,
    /// Rasterizing page 1 of the PDF to a PNG payload.
    Converting,
    /// Uploading the rasterized image to the document store.
    UploadingImage,
    /// Generating the submission ID and persisting the draft record.
    Preparing,
    /// Waiting on the AI backend, then extracting and parsing feedback.
    Analyzing,
    /// Final record persisted; the caller may navigate to the detail view.
    Complete,
    /// Terminal failure. The message is surfaced as `"Error: {message}"`.
    Failed(String),
}

impl PipelineState {
    /// The user-facing status line for this state.
    ///
    /// These literals are part of the observable surface (progress display
    /// in the host UI) and must stay in sync with the transition they
    /// accompany.
    pub fn status_text(&self) -> String {
        match self {
            PipelineState::Idle => String::new(),
            PipelineState::Uploading => "Uploading the file...".to_string(),
            PipelineState::Converting => "Converting to image...".to_string(),
            PipelineState::UploadingImage => "Uploading the image...".to_string(),
            PipelineState::Preparing => "Preparing data...".to_string(),
            PipelineState::Analyzing => "Analyzing...".to_string(),
            PipelineState::Complete => "Analysis Complete, redirecting...".to_string(),
            PipelineState::Failed(message) => format!("Error: {message}"),
        }
    }

    /// Whether this state ends the run (successfully or not).
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Complete | PipelineState::Failed(_))
    }
}

/// Called by the orchestrator on every state transition.
///
/// The single method has a default no-op implementation so observers that
/// only care about, say, terminal states can filter inside their impl.
/// Must be `Send + Sync`: the same observer may be shared by several
/// independent pipeline runs.
pub trait StatusObserver: Send + Sync {
    /// Called synchronously with each transition, before the pipeline
    /// performs the work associated with the new state.
    ///
    /// # Arguments
    /// * `state`       — the state just entered
    /// * `status_text` — the display text for that state (see
    ///   [`PipelineState::status_text`])
    fn on_transition(&self, state: &PipelineState, status_text: &str) {
        let _ = (state, status_text);
    }
}

/// A no-op implementation for callers that don't need status events.
///
/// This is the default when no observer is configured.
pub struct NoopStatusObserver;

impl StatusObserver for NoopStatusObserver {}

/// Convenience alias matching the type stored in [`crate::config::AnalysisConfig`].
pub type SharedStatusObserver = Arc<dyn StatusObserver>;
