//! Pipeline stages for résumé analysis.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets hosts swap
//! implementations (e.g. a different rendering backend) without touching
//! the others.
//!
//! ## Data Flow
//!
//! ```text
//! rasterize ──▶ extract ──▶ parse
//! (pdfium)      (content     (JSON-in-prose
//!                → text)      → object)
//! ```
//!
//! 1. [`rasterize`] — render page 1 to a PNG payload; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 2. [`extract`]   — normalize the polymorphic AI message content to a
//!    single trimmed string
//! 3. [`parse`]     — recover a structured JSON object from text that may
//!    be wrapped in prose
//!
//! Upload and persistence stages have no module of their own: they are
//! single calls on the injected [`crate::clients`] traits, sequenced by
//! [`crate::analyze`].

pub mod extract;
pub mod parse;
pub mod rasterize;
