//! Configuration for a résumé analysis run.
//!
//! Every knob lives in [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. Keeping the settings in one struct makes it
//! trivial to share a config across submissions and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest, and it survives new fields without
//! breaking call sites.

use crate::error::AnalysisError;
use crate::status::SharedStatusObserver;
use std::fmt;

/// Configuration for one (or many) pipeline runs.
///
/// Built via [`AnalysisConfig::builder()`] or [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use resumind_pipeline::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .max_rendered_pixels(1600)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Maximum rendered image dimension (width or height) in pixels.
    /// Range: 100–8000. Default: 2000.
    ///
    /// Page sizes vary wildly; capping the longest edge keeps memory
    /// bounded regardless of physical page size and lands in the
    /// image-size sweet spot for vision models (around 1,024–2,048 px).
    pub max_rendered_pixels: u32,

    /// Custom feedback instructions. If `None`, the pipeline builds them
    /// from [`crate::prompts::prepare_instructions`] and the submission's
    /// job context.
    pub instructions: Option<String>,

    /// Observer notified synchronously on every state transition.
    /// If `None`, transitions are silent.
    pub status_observer: Option<SharedStatusObserver>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_rendered_pixels: 2000,
            instructions: None,
            status_observer: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("instructions", &self.instructions)
            .field(
                "status_observer",
                &self.status_observer.as_ref().map(|_| "<dyn StatusObserver>"),
            )
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px;
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.config.instructions = Some(instructions.into());
        self
    }

    pub fn status_observer(mut self, observer: SharedStatusObserver) -> Self {
        self.config.status_observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, AnalysisError> {
        let c = &self.config;
        if c.max_rendered_pixels < 100 || c.max_rendered_pixels > 8000 {
            return Err(AnalysisError::InvalidConfig(format!(
                "max_rendered_pixels must be 100–8000, got {}",
                c.max_rendered_pixels
            )));
        }
        if let Some(ref instructions) = c.instructions {
            if instructions.trim().is_empty() {
                return Err(AnalysisError::InvalidConfig(
                    "instructions override must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}
