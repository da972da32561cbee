//! Capability traits for the external collaborators.
//!
//! The caption model and the translation service are consumed only through
//! these traits, so the request pipeline can be built with real network
//! backends in production and in-memory fakes in tests.

use async_trait::async_trait;

use crate::{DecodedImage, Result};

/// Backend that turns an image into raw English model output.
#[async_trait]
pub trait CaptionBackend: Send + Sync {
    /// Run one inference pass and return the model's raw text output.
    ///
    /// The output may still contain model control tokens.
    async fn generate_caption(&self, image: &DecodedImage) -> Result<String>;

    /// Load the model so the first request does not pay the cold start.
    async fn load(&self) -> Result<()> {
        Ok(())
    }

    /// Check if the caption backend is available.
    async fn health_check(&self) -> Result<bool>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Backend that translates text between languages.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate `text` from `source` to `target` (service identifiers).
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;

    /// Human-readable backend name for logs.
    fn name(&self) -> &str;
}
