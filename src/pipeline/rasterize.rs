//! Page-1 rasterization: PDF bytes → PNG payload via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto the
//! blocking thread pool so Tokio worker threads never stall during
//! CPU-heavy rendering.
//!
//! ## Why outcomes instead of errors?
//!
//! The rasterizer contract is "never raise": corrupt PDFs, a missing
//! pdfium library, render errors, and even a panicking blocking task all
//! come back as [`RasterOutcome`] with `image: None` and a diagnosis
//! string. The orchestrator owns turning that into the terminal
//! conversion-failure message; nothing in here decides pipeline policy.
//!
//! ## Why PNG?
//!
//! Lossless compression preserves text crispness. JPEG artefacts on
//! rendered text confuse vision models and degrade what is effectively
//! OCR accuracy.

use crate::clients::{FilePayload, RasterOutcome, Rasterizer};
use crate::config::AnalysisConfig;
use async_trait::async_trait;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Cursor;
use tracing::{debug, warn};

/// Default [`Rasterizer`] backed by a system pdfium library.
pub struct PdfiumRasterizer {
    max_rendered_pixels: u32,
}

impl PdfiumRasterizer {
    /// Build a rasterizer using the config's pixel cap.
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            max_rendered_pixels: config.max_rendered_pixels,
        }
    }
}

#[async_trait]
impl Rasterizer for PdfiumRasterizer {
    async fn rasterize(&self, pdf: &FilePayload) -> RasterOutcome {
        let bytes = pdf.bytes.clone();
        let image_name = png_name(&pdf.name);
        let max_pixels = self.max_rendered_pixels;

        let joined = tokio::task::spawn_blocking(move || {
            rasterize_first_page_blocking(&bytes, max_pixels)
        })
        .await;

        match joined {
            Ok(Ok(image)) => match encode_png(&image, &image_name) {
                Ok(payload) => {
                    debug!(
                        "Rasterized page 1 of {} → {} ({} bytes)",
                        pdf.name,
                        payload.name,
                        payload.bytes.len()
                    );
                    RasterOutcome::image(payload)
                }
                Err(e) => {
                    warn!("PNG encoding failed for {}: {}", pdf.name, e);
                    RasterOutcome::failed(format!("image encoding failed: {e}"))
                }
            },
            Ok(Err(detail)) => {
                warn!("Rasterization failed for {}: {}", pdf.name, detail);
                RasterOutcome::failed(detail)
            }
            Err(e) => {
                warn!("Rasterization task panicked for {}: {}", pdf.name, e);
                RasterOutcome::failed(format!("render task panicked: {e}"))
            }
        }
    }
}

/// Blocking implementation: load the document from bytes and render page 1.
///
/// Returns a plain `String` diagnosis on failure; classification into the
/// user-facing message happens at the orchestrator.
fn rasterize_first_page_blocking(
    pdf_bytes: &[u8],
    max_pixels: u32,
) -> Result<DynamicImage, String> {
    let bindings = Pdfium::bind_to_system_library()
        .map_err(|e| format!("pdfium library unavailable: {e}"))?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .map_err(|e| format!("could not open pdf: {e:?}"))?;

    let pages = document.pages();
    if pages.len() == 0 {
        return Err("pdf has no pages".to_string());
    }

    let page = pages
        .get(0)
        .map_err(|e| format!("could not read first page: {e:?}"))?;

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| format!("could not render first page: {e:?}"))?;

    let image = bitmap.as_image();
    debug!("Rendered first page → {}x{} px", image.width(), image.height());
    Ok(image)
}

/// PNG-encode a rendered page into an uploadable payload.
fn encode_png(image: &DynamicImage, name: &str) -> Result<FilePayload, image::ImageError> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(FilePayload::new(name, "image/png", buf))
}

/// Derive the image name from the PDF name: stem + `.png`.
fn png_name(pdf_name: &str) -> String {
    let stem = pdf_name
        .strip_suffix(".pdf")
        .or_else(|| pdf_name.strip_suffix(".PDF"))
        .unwrap_or(pdf_name);
    format!("{stem}.png")
}
