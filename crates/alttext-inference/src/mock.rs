//! Mock caption and translation backends for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use alttext_inference::mock::{MockCaptionBackend, MockTranslationBackend};
//! use alttext_inference::{CaptionEngine, Translator};
//!
//! let engine = CaptionEngine::new(Arc::new(MockCaptionBackend::with_caption("a dog")));
//! let translator = Translator::new(Arc::new(
//!     MockTranslationBackend::new().with_translation("hi", "एक कुत्ता"),
//! ));
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use alttext_core::{CaptionBackend, DecodedImage, Error, Result, TranslationBackend};

/// Mock caption backend returning a fixed caption or a fixed failure.
pub struct MockCaptionBackend {
    outcome: std::result::Result<String, String>,
    load_failure: Option<String>,
    available: bool,
    calls: AtomicUsize,
    loaded: AtomicBool,
}

impl MockCaptionBackend {
    /// Backend whose every inference returns `caption` verbatim.
    pub fn with_caption(caption: impl Into<String>) -> Self {
        Self::from_outcome(Ok(caption.into()))
    }

    /// Backend whose every inference fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_outcome(Err(message.into()))
    }

    fn from_outcome(outcome: std::result::Result<String, String>) -> Self {
        Self {
            outcome,
            load_failure: None,
            available: true,
            calls: AtomicUsize::new(0),
            loaded: AtomicBool::new(false),
        }
    }

    /// Make `load()` fail with `message`.
    pub fn with_load_failure(mut self, message: impl Into<String>) -> Self {
        self.load_failure = Some(message.into());
        self
    }

    /// Make `health_check()` report the model server as down.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Number of inference calls made.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptionBackend for MockCaptionBackend {
    async fn generate_caption(&self, _image: &DecodedImage) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(Error::Inference)
    }

    async fn load(&self) -> Result<()> {
        if let Some(msg) = &self.load_failure {
            return Err(Error::Inference(msg.clone()));
        }
        self.loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.available)
    }

    fn model_name(&self) -> &str {
        "mock-vision"
    }
}

/// A recorded translation call: (text, source, target).
pub type TranslationCall = (String, String, String);

/// Mock translation backend with per-target canned translations.
///
/// Targets without a canned translation fail, as does every call on a
/// backend built with [`MockTranslationBackend::failing`].
pub struct MockTranslationBackend {
    translations: HashMap<String, String>,
    failure: Option<String>,
    calls: Mutex<Vec<TranslationCall>>,
}

impl Default for MockTranslationBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranslationBackend {
    pub fn new() -> Self {
        Self {
            translations: HashMap::new(),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Backend whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Return `translated` for any text sent to `target`.
    pub fn with_translation(
        mut self,
        target: impl Into<String>,
        translated: impl Into<String>,
    ) -> Self {
        self.translations.insert(target.into(), translated.into());
        self
    }

    pub fn calls(&self) -> Vec<TranslationCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl TranslationBackend for MockTranslationBackend {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((text.to_string(), source.to_string(), target.to_string()));
        }

        if let Some(msg) = &self.failure {
            return Err(Error::Translation(msg.clone()));
        }
        self.translations
            .get(target)
            .cloned()
            .ok_or_else(|| Error::Translation(format!("No mock translation for {}", target)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
