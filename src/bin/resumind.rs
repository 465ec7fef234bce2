//! CLI binary for resumind-pipeline.
//!
//! A thin shim over the library crate: maps CLI flags to
//! `AnalysisConfig`, wires the reference adapters, drives a terminal
//! spinner from the pipeline's status signal, and prints the feedback.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use resumind_pipeline::adapters::{AnthropicFeedbackClient, DirKvStore, LocalFileStore};
use resumind_pipeline::{
    analyze, AlwaysAuthenticated, AnalysisConfig, AnalysisOutcome, Clients, Feedback,
    FilePayload, PdfiumRasterizer, PipelineState, SubmissionRequest, StatusObserver,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Spinner wired to the pipeline's status signal ────────────────────────────

/// Terminal status observer: one spinner whose message tracks the
/// pipeline's status text, transition by transition.
struct SpinnerObserver {
    bar: ProgressBar,
}

impl SpinnerObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl StatusObserver for SpinnerObserver {
    fn on_transition(&self, state: &PipelineState, status_text: &str) {
        self.bar.set_message(status_text.to_string());
        if let PipelineState::Complete = state {
            self.bar.println(format!("{} {}", green("✓"), status_text));
        }
    }
}

// ── CLI ──────────────────────────────────────────────────────────────────────

/// Analyse a résumé PDF against a job posting with AI feedback.
#[derive(Parser, Debug)]
#[command(name = "resumind", version, about)]
struct Cli {
    /// Path to the résumé PDF.
    file: PathBuf,

    /// Company name for the job context.
    #[arg(long, default_value = "")]
    company_name: String,

    /// Job title the résumé is aimed at.
    #[arg(long, default_value = "")]
    job_title: String,

    /// Job description text (or leave empty for generic feedback).
    #[arg(long, default_value = "")]
    job_description: String,

    /// Directory for stored documents and submission records.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Anthropic API key.
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Model to request feedback from.
    #[arg(long)]
    model: Option<String>,

    /// Maximum rendered image dimension in pixels.
    #[arg(long, default_value_t = 2000)]
    max_pixels: u32,

    /// Print the full feedback JSON instead of the score summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let bytes = std::fs::read(&cli.file)
        .with_context(|| format!("could not read {}", cli.file.display()))?;
    let name = cli
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "resume.pdf".to_string());

    let spinner = SpinnerObserver::new();
    let config = AnalysisConfig::builder()
        .max_rendered_pixels(cli.max_pixels)
        .status_observer(Arc::clone(&spinner) as Arc<dyn StatusObserver>)
        .build()?;

    let mut ai = AnthropicFeedbackClient::new(cli.api_key);
    if let Some(model) = cli.model {
        ai = ai.with_model(model);
    }

    let clients = Clients {
        auth: Arc::new(AlwaysAuthenticated),
        file_store: Arc::new(LocalFileStore::new(cli.data_dir.join("files"))),
        kv: Arc::new(DirKvStore::new(cli.data_dir.join("records"))),
        ai: Arc::new(ai),
        rasterizer: Arc::new(PdfiumRasterizer::new(&config)),
    };

    // The pipeline never checks auth itself; the surrounding flow does.
    if !clients.auth.is_authenticated() {
        bail!("not authenticated");
    }

    let request = SubmissionRequest {
        company_name: cli.company_name,
        job_title: cli.job_title,
        job_description: cli.job_description,
        file: Some(FilePayload::new(name, "application/pdf", bytes)),
    };

    let outcome = analyze(&clients, request, &config).await;
    spinner.finish();

    match outcome {
        AnalysisOutcome::Completed(record) => {
            println!("{} {}", bold("Submission:"), record.id);
            println!("{} {}", dim("resume:"), record.resume_path);
            println!("{} {}", dim("image: "), record.image_path);
            if let Feedback::Ready(ref feedback) = record.feedback {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(feedback)?);
                } else if let Some(score) = feedback.get("overallScore") {
                    println!("{} {}", bold("Overall score:"), score);
                } else {
                    println!("{}", serde_json::to_string_pretty(feedback)?);
                }
            }
            Ok(())
        }
        AnalysisOutcome::Failed { message } => {
            eprintln!("{} Error: {}", red("✗"), message);
            std::process::exit(1);
        }
        AnalysisOutcome::Skipped => {
            eprintln!("{}", dim("No file submitted; nothing to do."));
            Ok(())
        }
    }
}
