//! The upload-to-feedback orchestrator.
//!
//! One call to [`analyze`] drives a full submission: store the PDF,
//! rasterize page 1, store the image, persist a draft record, call the AI
//! backend, extract and parse the feedback, persist the final record.
//! Steps run strictly sequentially — each awaits the previous, there is
//! no fan-out, no retry, no timeout. A failure at any step is terminal
//! for the run; the user resubmits.
//!
//! ## Failure policy
//!
//! Every failure funnels through one boundary at the bottom of
//! [`analyze`] and becomes a single terminal [`PipelineState::Failed`]
//! with a user-facing message; nothing is silently swallowed except the
//! missing-file guard on entry, which is a form-validation concern and a
//! deliberate no-op.
//!
//! ## Draft-before-analysis invariant
//!
//! The draft record (feedback sentinel) is persisted *before* the AI call
//! is made. A crash or failure from `Analyzing` onward therefore leaves a
//! discoverable, inspectable partial record keyed by the submission ID;
//! a failure strictly before the draft write leaves no record at all.

use crate::clients::{Clients, FilePayload};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::id::new_submission_id;
use crate::pipeline::{extract, parse};
use crate::prompts::prepare_instructions;
use crate::record::{Feedback, SubmissionRecord};
use crate::status::PipelineState;
use tracing::{debug, info, warn};

/// One submit action's inputs.
///
/// `file` is optional to mirror the submit form: a request without a file
/// is silently ignored (no transition happens, no status is emitted).
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub file: Option<FilePayload>,
}

/// How a pipeline run ended.
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// The final record was persisted; `record.id` addresses the detail
    /// view the host should navigate to.
    Completed(SubmissionRecord),
    /// Terminal failure; `message` is what the status signal surfaced
    /// (without the `"Error: "` prefix).
    Failed { message: String },
    /// The request carried no file; nothing happened.
    Skipped,
}

impl AnalysisOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, AnalysisOutcome::Completed(_))
    }
}

/// Run the full analysis pipeline for one submission.
///
/// This is the primary entry point for the library. Each state
/// transition synchronously notifies the configured status observer
/// before the work of that state begins.
pub async fn analyze(
    clients: &Clients,
    request: SubmissionRequest,
    config: &AnalysisConfig,
) -> AnalysisOutcome {
    // Missing file: no transition occurs, by design.
    let Some(file) = request.file.clone() else {
        debug!("Submission without a file ignored");
        return AnalysisOutcome::Skipped;
    };

    let mut run = PipelineRun {
        state: PipelineState::Idle,
        clients,
        config,
    };

    match run.execute(&request, file).await {
        Ok(record) => {
            run.transition(PipelineState::Complete);
            info!("Analysis complete for submission {}", record.id);
            AnalysisOutcome::Completed(record)
        }
        Err(e) => {
            let message = e.failure_message();
            warn!("Analysis failed: {}", message);
            run.transition(PipelineState::Failed(message.clone()));
            AnalysisOutcome::Failed { message }
        }
    }
}

/// State holder for a single run.
///
/// A fresh instance per submission: no shared mutable state crosses
/// submissions, and each run writes only to its own record key.
struct PipelineRun<'a> {
    state: PipelineState,
    clients: &'a Clients,
    config: &'a AnalysisConfig,
}

impl PipelineRun<'_> {
    /// Advance to `next` and notify the observer synchronously.
    fn transition(&mut self, next: PipelineState) {
        let text = next.status_text();
        self.state = next;
        if let Some(ref observer) = self.config.status_observer {
            observer.on_transition(&self.state, &text);
        }
    }

    /// The forward path. Any `Err` is mapped to `Failed` by the caller.
    async fn execute(
        &mut self,
        request: &SubmissionRequest,
        file: FilePayload,
    ) -> Result<SubmissionRecord, AnalysisError> {
        // ── Step 1: Upload the raw PDF ───────────────────────────────────
        self.transition(PipelineState::Uploading);
        let resume = self
            .clients
            .file_store
            .upload(vec![file.clone()])
            .await
            .map_err(internal)?
            .ok_or(AnalysisError::ResumeUploadFailed)?;
        debug!("Stored resume at {}", resume.path);

        // ── Step 2: Rasterize page 1 ─────────────────────────────────────
        self.transition(PipelineState::Converting);
        let outcome = self.clients.rasterizer.rasterize(&file).await;
        let image = outcome.image.ok_or(AnalysisError::ConversionFailed {
            detail: outcome.error,
        })?;

        // ── Step 3: Upload the image ─────────────────────────────────────
        self.transition(PipelineState::UploadingImage);
        let stored_image = self
            .clients
            .file_store
            .upload(vec![image])
            .await
            .map_err(internal)?
            .ok_or(AnalysisError::ImageUploadFailed)?;
        debug!("Stored image at {}", stored_image.path);

        // ── Step 4: Persist the draft record ─────────────────────────────
        self.transition(PipelineState::Preparing);
        let id = new_submission_id();
        let mut record = SubmissionRecord::draft(
            id,
            resume.path,
            stored_image.path,
            request.company_name.clone(),
            request.job_title.clone(),
            request.job_description.clone(),
        );
        self.persist(&record).await?;

        // ── Step 5: Analyse ──────────────────────────────────────────────
        self.transition(PipelineState::Analyzing);
        let instructions = match self.config.instructions {
            Some(ref custom) => custom.clone(),
            None => prepare_instructions(&record.job_title, &record.job_description),
        };
        let response = self
            .clients
            .ai
            .feedback(&record.resume_path, &record.image_path, &instructions)
            .await
            .map_err(internal)?
            .ok_or(AnalysisError::AnalysisFailed)?;

        // ── Step 6: Extract and parse feedback ───────────────────────────
        let text = extract::extract_text(&response.message.content);
        let feedback = parse::parse_feedback(&text)?;
        record.feedback = Feedback::Ready(feedback);

        // ── Step 7: Persist the final record ─────────────────────────────
        self.persist(&record).await?;

        Ok(record)
    }

    /// Serialize and write the record under its `"resume {id}"` key.
    async fn persist(&self, record: &SubmissionRecord) -> Result<(), AnalysisError> {
        let value = serde_json::to_string(record)
            .map_err(|e| AnalysisError::Internal(format!("record serialization failed: {e}")))?;
        self.clients
            .kv
            .set(&record.kv_key(), &value)
            .await
            .map_err(internal)
    }
}

/// Collaborator transport errors fold into the catch-all variant.
fn internal(e: crate::clients::BoxError) -> AnalysisError {
    AnalysisError::Internal(e.to_string())
}
