//! The submission record persisted to the key-value store.
//!
//! A [`SubmissionRecord`] is created once per submission, written in
//! draft form (feedback unset) *before* the AI call, and rewritten once
//! with the parsed feedback after analysis succeeds. Persisting the draft
//! first means a crash mid-pipeline leaves a discoverable partial record
//! keyed by `id` instead of nothing.
//!
//! Wire format: camelCase field names and the empty-string feedback
//! sentinel match the JSON payloads existing record stores already hold,
//! so records written by this crate and by the original front end are
//! interchangeable.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// The structured feedback object recovered from the AI response.
///
/// An arbitrary JSON object; this crate validates "is a JSON object" and
/// nothing further (scoring schema is the AI backend's concern).
pub type StructuredFeedback = Map<String, Value>;

/// Feedback slot of a [`SubmissionRecord`].
///
/// Serializes as `""` while pending (the draft sentinel) and as the raw
/// JSON object once ready; mutated exactly once, from `Pending` to
/// `Ready`, between the two writes of a successful run.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Feedback {
    /// Draft sentinel: analysis has not produced feedback yet.
    #[default]
    Pending,
    /// Parsed structured feedback.
    Ready(StructuredFeedback),
}

impl Feedback {
    pub fn is_pending(&self) -> bool {
        matches!(self, Feedback::Pending)
    }
}

impl Serialize for Feedback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Feedback::Pending => serializer.serialize_str(""),
            Feedback::Ready(obj) => obj.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Feedback {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) if s.is_empty() => Ok(Feedback::Pending),
            Value::Object(obj) => Ok(Feedback::Ready(obj)),
            other => Err(D::Error::custom(format!(
                "feedback must be \"\" or a JSON object, got {other}"
            ))),
        }
    }
}

/// One user-initiated résumé analysis request and its progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// Opaque unique ID, generated once, immutable.
    pub id: String,
    /// Locator of the stored original PDF.
    pub resume_path: String,
    /// Locator of the stored rasterized image.
    pub image_path: String,
    /// Job-context text, set at creation, immutable thereafter.
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    /// Draft sentinel or the parsed feedback object.
    pub feedback: Feedback,
}

impl SubmissionRecord {
    /// Build the draft record persisted before the AI call.
    pub fn draft(
        id: impl Into<String>,
        resume_path: impl Into<String>,
        image_path: impl Into<String>,
        company_name: impl Into<String>,
        job_title: impl Into<String>,
        job_description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            resume_path: resume_path.into(),
            image_path: image_path.into(),
            company_name: company_name.into(),
            job_title: job_title.into(),
            job_description: job_description.into(),
            feedback: Feedback::Pending,
        }
    }

    /// The record-store key for this submission.
    pub fn kv_key(&self) -> String {
        format!("resume {}", self.id)
    }
}
