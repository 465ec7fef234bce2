//! Rasterizer tests that need a real pdfium library.
//!
//! Gated behind the `RESUMIND_E2E_PDF` environment variable (a path to
//! any one-page-or-more PDF) so CI without pdfium or test assets skips
//! them instead of failing.
//!
//! Run with:
//!   RESUMIND_E2E_PDF=./resume.pdf cargo test --test rasterize -- --nocapture

use resumind_pipeline::{AnalysisConfig, FilePayload, PdfiumRasterizer, Rasterizer};

/// Skip this test unless RESUMIND_E2E_PDF points at a readable PDF.
macro_rules! e2e_skip_unless_ready {
    () => {{
        let Ok(path) = std::env::var("RESUMIND_E2E_PDF") else {
            println!("SKIP — set RESUMIND_E2E_PDF=/path/to/a.pdf to run pdfium tests");
            return;
        };
        match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                println!("SKIP — could not read {path}: {e}");
                return;
            }
        }
    }};
}

#[tokio::test]
async fn renders_first_page_to_png() {
    let bytes = e2e_skip_unless_ready!();
    let config = AnalysisConfig::default();
    let rasterizer = PdfiumRasterizer::new(&config);

    let outcome = rasterizer
        .rasterize(&FilePayload::new("resume.pdf", "application/pdf", bytes))
        .await;

    let image = outcome.image.expect("expected a rendered page");
    assert_eq!(image.mime, "image/png");
    assert_eq!(image.name, "resume.png");
    assert_eq!(&image.bytes[..4], &[0x89, b'P', b'N', b'G']);
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn corrupt_pdf_yields_outcome_not_panic() {
    // Needs pdfium present, so it shares the gate even though the input
    // is synthetic.
    let _ = e2e_skip_unless_ready!();
    let config = AnalysisConfig::default();
    let rasterizer = PdfiumRasterizer::new(&config);

    let outcome = rasterizer
        .rasterize(&FilePayload::new(
            "garbage.pdf",
            "application/pdf",
            b"this is not a pdf".to_vec(),
        ))
        .await;

    assert!(outcome.image.is_none());
    assert!(outcome.error.is_some(), "expected a diagnosis string");
}

#[tokio::test]
async fn rendering_is_deterministic_for_fixed_input() {
    let bytes = e2e_skip_unless_ready!();
    let config = AnalysisConfig::default();
    let rasterizer = PdfiumRasterizer::new(&config);
    let payload = FilePayload::new("resume.pdf", "application/pdf", bytes);

    let first = rasterizer.rasterize(&payload).await.image.unwrap();
    let second = rasterizer.rasterize(&payload).await.image.unwrap();
    assert_eq!(first.bytes, second.bytes);
}
