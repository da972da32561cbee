//! Caption engine: the shared caption capability used by every request.
//!
//! Wraps a [`CaptionBackend`] with output decoding (control-token stripping),
//! the non-empty caption guarantee, and an optional limit on concurrent
//! inference calls for model servers that cannot take unbounded parallel load.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{debug, info};

use alttext_core::defaults;
use alttext_core::{CaptionBackend, DecodedImage, Error, Result};

use crate::tokens::strip_control_tokens;

/// Process-wide caption capability. Cheap to clone; clones share the backend
/// and the concurrency limit.
#[derive(Clone)]
pub struct CaptionEngine {
    backend: Arc<dyn CaptionBackend>,
    limiter: Option<Arc<Semaphore>>,
}

impl CaptionEngine {
    /// Create an engine with no concurrency limit.
    pub fn new(backend: Arc<dyn CaptionBackend>) -> Self {
        Self {
            backend,
            limiter: None,
        }
    }

    /// Allow at most `permits` inference calls in flight. Zero disables the limit.
    pub fn with_max_concurrent(mut self, permits: usize) -> Self {
        self.limiter = (permits > 0).then(|| Arc::new(Semaphore::new(permits)));
        self
    }

    /// Apply `CAPTION_MAX_CONCURRENT` from the environment, if set.
    pub fn with_env_limit(self) -> Self {
        match std::env::var(defaults::ENV_CAPTION_MAX_CONCURRENT)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            Some(permits) => {
                info!("Caption concurrency limited to {} in-flight requests", permits);
                self.with_max_concurrent(permits)
            }
            None => self,
        }
    }

    /// Load the model. Called once before the server accepts traffic.
    pub async fn load(&self) -> Result<()> {
        let start = Instant::now();
        self.backend.load().await?;
        info!(
            model = %self.backend.model_name(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Caption model loaded"
        );
        Ok(())
    }

    /// Produce a non-empty English caption for a decoded image.
    pub async fn caption(&self, image: &DecodedImage) -> Result<String> {
        let _permit = match &self.limiter {
            Some(limiter) => Some(
                limiter
                    .acquire()
                    .await
                    .map_err(|e| Error::Internal(format!("Caption limiter closed: {}", e)))?,
            ),
            None => None,
        };

        let start = Instant::now();
        let raw = self.backend.generate_caption(image).await?;
        let caption = strip_control_tokens(&raw);

        debug!(
            model = %self.backend.model_name(),
            response_len = raw.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Caption generated"
        );

        if caption.is_empty() {
            return Err(Error::Inference("Model returned an empty caption".into()));
        }
        Ok(caption)
    }

    pub async fn health_check(&self) -> Result<bool> {
        self.backend.health_check().await
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }
}
