//! # resumind-pipeline
//!
//! Upload-to-feedback orchestration for AI résumé review.
//!
//! ## What this crate does
//!
//! A user submits a résumé PDF plus job-context text and receives
//! structured, scored feedback from an AI backend. This crate is the
//! stateful workflow in between: it persists the document, rasterizes
//! page 1 for visual-model consumption, calls the feedback backend,
//! recovers a JSON object from the model's noisy reply, and persists
//! progress at each step so partial failure is recoverable and
//! observable.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF + job context
//!  │
//!  ├─ 1. Upload     store the raw PDF, keep its locator
//!  ├─ 2. Rasterize  page 1 → PNG via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Upload     store the PNG, keep its locator
//!  ├─ 4. Prepare    generate an ID, persist the draft record
//!  ├─ 5. Analyse    AI call → extract text → parse JSON feedback
//!  └─ 6. Finalise   persist the record with feedback, signal completion
//! ```
//!
//! Steps run strictly sequentially with no internal retries; any failure
//! terminates the run with a single user-facing message. The draft record
//! is always persisted *before* the AI call, so a crash mid-run leaves an
//! inspectable partial record.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resumind_pipeline::{
//!     analyze, AnalysisConfig, AnalysisOutcome, Clients, FilePayload, SubmissionRequest,
//! };
//! use resumind_pipeline::adapters::{AnthropicFeedbackClient, DirKvStore, LocalFileStore};
//! use resumind_pipeline::{AlwaysAuthenticated, PdfiumRasterizer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::default();
//!     let clients = Clients {
//!         auth: Arc::new(AlwaysAuthenticated),
//!         file_store: Arc::new(LocalFileStore::new("data/files")),
//!         kv: Arc::new(DirKvStore::new("data/records")),
//!         ai: Arc::new(AnthropicFeedbackClient::new(std::env::var("ANTHROPIC_API_KEY")?)),
//!         rasterizer: Arc::new(PdfiumRasterizer::new(&config)),
//!     };
//!
//!     let request = SubmissionRequest {
//!         company_name: "Acme".into(),
//!         job_title: "Staff Engineer".into(),
//!         job_description: "Own the storage layer".into(),
//!         file: Some(FilePayload::new(
//!             "resume.pdf",
//!             "application/pdf",
//!             std::fs::read("resume.pdf")?,
//!         )),
//!     };
//!
//!     match analyze(&clients, request, &config).await {
//!         AnalysisOutcome::Completed(record) => println!("feedback ready: {}", record.id),
//!         AnalysisOutcome::Failed { message } => eprintln!("Error: {message}"),
//!         AnalysisOutcome::Skipped => {}
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Substituting collaborators
//!
//! Every external service — file store, record store, AI backend,
//! rasterizer, auth session — is an injected trait on [`Clients`], never
//! an ambient global. The [`adapters`] module ships reference
//! implementations; hosts with real backends implement the same traits,
//! and tests use recording doubles.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `resumind` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod adapters;
pub mod analyze;
pub mod clients;
pub mod config;
pub mod error;
pub mod id;
pub mod pipeline;
pub mod prompts;
pub mod record;
pub mod status;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, AnalysisOutcome, SubmissionRequest};
pub use clients::{
    AiMessage, AlwaysAuthenticated, AuthSession, BoxError, Clients, ContentPart, FeedbackAi,
    FeedbackResponse, FilePayload, FileStore, KvStore, MessageContent, RasterOutcome, Rasterizer,
    StoredFile,
};
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use error::{AnalysisError, ParseError};
pub use id::new_submission_id;
pub use pipeline::extract::extract_text;
pub use pipeline::parse::parse_feedback;
pub use pipeline::rasterize::PdfiumRasterizer;
pub use record::{Feedback, StructuredFeedback, SubmissionRecord};
pub use status::{NoopStatusObserver, PipelineState, SharedStatusObserver, StatusObserver};
