//! Request pipeline: validate, decode, caption, translate.
//!
//! The pipeline is independent of the HTTP layer. It takes a parsed
//! [`CaptionRequest`] and returns either the final caption or a
//! [`PipelineError`] naming the stage that stopped it. Translation cannot
//! fail the pipeline; the [`Translator`] degrades to English instead.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, error, info};

use alttext_core::{CaptionRequest, Error};
use alttext_inference::{CaptionEngine, Translator};

/// Terminal failure of a caption request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request carried no image part.
    #[error("No image file provided")]
    MissingImage,

    /// The image part was present but empty.
    #[error("Empty image file")]
    EmptyImage,

    /// The image bytes are not a supported encoding. Carries decoder detail
    /// for logs; the display message is the client-facing one.
    #[error("Invalid image format")]
    InvalidImageFormat(String),

    /// Inference failed. Carries the internal error for logs only.
    #[error("Caption generation failed")]
    CaptionGenerationFailed(String),
}

impl PipelineError {
    /// Machine-readable identifier for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingImage => "missing_image",
            Self::EmptyImage => "empty_image",
            Self::InvalidImageFormat(_) => "invalid_image_format",
            Self::CaptionGenerationFailed(_) => "caption_generation_failed",
        }
    }

    /// True for errors the client caused and can fix.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::CaptionGenerationFailed(_))
    }
}

/// The caption pipeline with its capabilities injected at construction.
#[derive(Clone)]
pub struct CaptionPipeline {
    engine: CaptionEngine,
    translator: Translator,
}

impl CaptionPipeline {
    pub fn new(engine: CaptionEngine, translator: Translator) -> Self {
        Self { engine, translator }
    }

    pub fn engine(&self) -> &CaptionEngine {
        &self.engine
    }

    /// Run one request through every stage.
    pub async fn run(&self, request: CaptionRequest) -> Result<String, PipelineError> {
        let start = Instant::now();
        let language = request.language_or_default().to_string();

        let bytes = request.image.ok_or(PipelineError::MissingImage)?;
        if bytes.is_empty() {
            return Err(PipelineError::EmptyImage);
        }

        let image = alttext_core::decode(&bytes).map_err(|e| match e {
            Error::EmptyInput(_) => PipelineError::EmptyImage,
            other => PipelineError::InvalidImageFormat(other.to_string()),
        })?;
        drop(bytes);

        debug!(
            filename = request.filename.as_deref().unwrap_or("-"),
            width = image.width(),
            height = image.height(),
            language = %language,
            "Image accepted"
        );

        let english = self.engine.caption(&image).await.map_err(|e| {
            error!(
                model = %self.engine.model_name(),
                error = %e,
                "Caption generation failed"
            );
            PipelineError::CaptionGenerationFailed(e.to_string())
        })?;
        drop(image);

        let caption = self.translator.translate(&english, &language).await;

        info!(
            language = %language,
            english = %english,
            duration_ms = start.elapsed().as_millis() as u64,
            "Caption complete"
        );
        Ok(caption)
    }
}
