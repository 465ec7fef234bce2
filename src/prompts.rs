//! Instructions sent to the AI feedback backend.
//!
//! Centralising the instruction text here serves two purposes:
//!
//! 1. **Single source of truth** — changing what the model is asked for
//!    (new scoring category, different tip count) is an edit in exactly
//!    one place.
//!
//! 2. **Testability** — unit tests can inspect the prepared instructions
//!    directly without calling a real backend, so regressions in the
//!    job-context interpolation are easy to catch.
//!
//! Callers can override the whole template via
//! [`crate::config::AnalysisConfig::instructions`]; this module is used
//! only when no override is provided.

/// The response shape the model is instructed to produce.
///
/// The pipeline's parser validates only "is a JSON object"; this contract
/// exists so the backend reliably produces one. Categories mirror what
/// the feedback detail view renders.
pub const RESPONSE_FORMAT: &str = r#"{
  "overallScore": number (0-100),
  "ATS": { "score": number (0-100), "tips": [{ "type": "good" | "improve", "tip": string }] },
  "toneAndStyle": { "score": number (0-100), "tips": [{ "type": "good" | "improve", "tip": string, "explanation": string }] },
  "content": { "score": number (0-100), "tips": [{ "type": "good" | "improve", "tip": string, "explanation": string }] },
  "structure": { "score": number (0-100), "tips": [{ "type": "good" | "improve", "tip": string, "explanation": string }] },
  "skills": { "score": number (0-100), "tips": [{ "type": "good" | "improve", "tip": string, "explanation": string }] }
}"#;

/// Build the feedback instructions for one submission.
///
/// Interpolates the job context into the template. The closing directive
/// asks for bare JSON, but backends routinely wrap it in prose anyway —
/// which is exactly what the lenient span recovery in
/// [`crate::pipeline::parse`] exists for.
pub fn prepare_instructions(job_title: &str, job_description: &str) -> String {
    format!(
        r#"You are an expert in ATS (Applicant Tracking Systems) and resume review.
Analyze and rate the attached resume, then suggest concrete improvements.
The rating can be low if the resume is bad. Be thorough and detailed; do not
hesitate to point out mistakes or areas for improvement.

If available, use the job description for the role the user is applying to
when giving feedback. Take the description into account heavily.

The job title is: {job_title}
The job description is: {job_description}

Provide the feedback using the following format:
{RESPONSE_FORMAT}

Return the analysis as a JSON object only, without any other text and
without backticks. Do not include any commentary before or after the JSON."#
    )
}
