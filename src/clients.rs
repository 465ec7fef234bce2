//! Collaborator traits and the payloads that cross them.
//!
//! The pipeline consumes four external services — a document store, a
//! key-value record store, an AI feedback backend, and a rasterizer —
//! plus an authentication session it never drives itself. Each is an
//! object-safe trait injected through [`Clients`] rather than reached as
//! a global singleton, so tests substitute recording doubles and hosts
//! substitute whatever backend they run against.
//!
//! The traits deliberately mirror the collaborator contracts, not Rust
//! convenience: the document store reports a *missing* locator as
//! `Ok(None)` (a guarded, message-mapped pipeline failure) and reserves
//! `Err` for transport-level surprises that fall through to the
//! orchestrator's catch-all.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Boxed error for collaborator transport failures.
///
/// Anything a collaborator returns here is caught at the pipeline
/// boundary and mapped to a terminal `Failed` state with the error's
/// display text as the message.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ── Payloads ─────────────────────────────────────────────────────────────

/// A raw byte payload plus the name/content-type hints a store needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    /// File name hint, e.g. `"resume.pdf"` or `"resume.png"`.
    pub name: String,
    /// MIME content-type hint, e.g. `"application/pdf"`.
    pub mime: String,
    /// The payload bytes.
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// The document store's handle to an uploaded payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Opaque locator usable later for retrieval/display.
    pub path: String,
}

/// Result of rasterizing page 1 of a PDF.
///
/// The rasterizer never fails outright: on any internal problem it
/// returns `image: None` and, when it can, a human-readable `error`
/// detail. The orchestrator turns that into the terminal
/// "Failed to convert pdf to image" message.
#[derive(Debug, Default)]
pub struct RasterOutcome {
    /// PNG payload of the first page, ready for upload, or `None`.
    pub image: Option<FilePayload>,
    /// Optional diagnosis when `image` is `None`.
    pub error: Option<String>,
}

impl RasterOutcome {
    /// A successful outcome carrying the rendered page.
    pub fn image(image: FilePayload) -> Self {
        Self {
            image: Some(image),
            error: None,
        }
    }

    /// A failed outcome carrying a diagnosis.
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            image: None,
            error: Some(detail.into()),
        }
    }
}

// ── AI response wire shape ───────────────────────────────────────────────

/// The AI backend's reply envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub message: AiMessage,
}

/// The message inside a [`FeedbackResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiMessage {
    pub content: MessageContent,
}

/// The polymorphic `content` field of an AI message.
///
/// Backends reply with either a plain string or an ordered sequence of
/// typed parts; anything else (null, bare object, number) is modelled by
/// the `Other` catch-all so deserialization is total and the extractor
/// can degrade to an empty string instead of erroring.
///
/// Untagged variant order matters: strings must be tried before part
/// sequences, and `Other` must come last because a `serde_json::Value`
/// accepts any shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text reply.
    Text(String),
    /// Ordered sequence of typed content parts.
    Parts(Vec<ContentPart>),
    /// Any other shape. Contributes no text.
    Other(serde_json::Value),
}

/// One element of a part-sequence reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    /// A part carrying `{type: …, text: …}` with both fields as strings.
    /// Only parts whose `type` is `"text"` contribute to extraction.
    Typed {
        #[serde(rename = "type")]
        kind: String,
        text: String,
    },
    /// A part of any other shape (image blocks, missing fields, non-object
    /// entries). Ignored by extraction.
    Other(serde_json::Value),
}

// ── Collaborator traits ──────────────────────────────────────────────────

/// Durable byte storage returning opaque path locators.
///
/// One call performs at most one write; the pipeline never retries — a
/// `None` locator is a hard failure for the whole run.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Upload the given payloads, returning the stored handle, or `None`
    /// when the store accepted the call but produced no locator.
    async fn upload(&self, files: Vec<FilePayload>) -> Result<Option<StoredFile>, BoxError>;
}

/// Durable key-value mapping from submission key to serialized record.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Set `key` to `value`, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), BoxError>;
}

/// The AI feedback backend.
#[async_trait]
pub trait FeedbackAi: Send + Sync {
    /// Request feedback for the stored résumé/image pair.
    ///
    /// `Ok(None)` means the backend produced no usable response (mapped to
    /// the "Failed to analyse Resume" terminal state); `Err` is a
    /// transport failure handled by the catch-all.
    async fn feedback(
        &self,
        resume_locator: &str,
        image_locator: &str,
        instructions: &str,
    ) -> Result<Option<FeedbackResponse>, BoxError>;
}

/// Page-1 PDF rasterization. See [`RasterOutcome`] for the no-raise contract.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, pdf: &FilePayload) -> RasterOutcome;
}

/// Authentication session boundary.
///
/// The pipeline itself never consults this; the surrounding flow gates on
/// it before a submission can start (unauthenticated users are redirected
/// by the host, which is out of scope here).
pub trait AuthSession: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

/// An [`AuthSession`] that is always signed in, for hosts that handle
/// authentication entirely outside this crate.
pub struct AlwaysAuthenticated;

impl AuthSession for AlwaysAuthenticated {
    fn is_authenticated(&self) -> bool {
        true
    }
}

// ── Capability bundle ────────────────────────────────────────────────────

/// The injected collaborator handles one pipeline run needs.
///
/// Cheap to clone; every handle is an `Arc`.
#[derive(Clone)]
pub struct Clients {
    pub auth: Arc<dyn AuthSession>,
    pub file_store: Arc<dyn FileStore>,
    pub kv: Arc<dyn KvStore>,
    pub ai: Arc<dyn FeedbackAi>,
    pub rasterizer: Arc<dyn Rasterizer>,
}
