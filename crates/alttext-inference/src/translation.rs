//! Caption translation.
//!
//! [`GoogleTranslateBackend`] talks to the Google Translate web endpoint.
//! [`Translator`] sits in front of any [`TranslationBackend`] and enforces the
//! caption contract: English is returned as-is without a network call, and
//! any failure (including an unknown language code) falls back to the
//! English text instead of failing the request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use alttext_core::defaults;
use alttext_core::{Error, Language, Result, TranslationBackend};

/// Google Translate backend using the public `translate_a/single` endpoint.
pub struct GoogleTranslateBackend {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl GoogleTranslateBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout_secs: defaults::TRANSLATE_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Create from `TRANSLATE_BASE_URL` and `TRANSLATE_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let base_url = std::env::var(defaults::ENV_TRANSLATE_BASE_URL)
            .unwrap_or_else(|_| defaults::TRANSLATE_BASE_URL.to_string());
        let timeout_secs = std::env::var(defaults::ENV_TRANSLATE_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::TRANSLATE_TIMEOUT_SECS);

        info!(
            "Initializing Google Translate backend: url={}, timeout={}s",
            base_url, timeout_secs
        );
        Self::new(base_url).with_timeout_secs(timeout_secs)
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body is a nested array; element 0 lists `[translated, original, ...]`
/// pairs, one per sentence.
fn parse_segments(body: &serde_json::Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| Error::Translation("Unexpected response shape".into()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|s| s.as_str()))
        .collect();

    if translated.trim().is_empty() {
        return Err(Error::Translation("Empty translation".into()));
    }
    Ok(translated)
}

#[async_trait]
impl TranslationBackend for GoogleTranslateBackend {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let url = format!("{}/translate_a/single", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| Error::Translation(format!("Translate request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::Translation(format!(
                "Translate API returned {}",
                status
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Translation(format!("Failed to parse translate response: {}", e)))?;

        parse_segments(&body)
    }

    fn name(&self) -> &str {
        "google"
    }
}

/// Caption translator with identity and English-fallback rules.
#[derive(Clone)]
pub struct Translator {
    backend: Arc<dyn TranslationBackend>,
}

impl Translator {
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self { backend }
    }

    /// Translate an English caption into the language named by `language_code`.
    ///
    /// Never fails: `"en"` returns `text` without calling the backend, and an
    /// unknown code or any backend error returns `text` unchanged.
    pub async fn translate(&self, text: &str, language_code: &str) -> String {
        let language = match language_code.parse::<Language>() {
            Ok(language) => language,
            Err(e) => {
                warn!(error = %e, "Unsupported language code, returning English caption");
                return text.to_string();
            }
        };

        if language.is_source() {
            return text.to_string();
        }

        let start = Instant::now();
        match self
            .backend
            .translate(text, Language::English.target_code(), language.target_code())
            .await
        {
            Ok(translated) => {
                debug!(
                    backend = %self.backend.name(),
                    language = %language,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Caption translated"
                );
                translated
            }
            Err(e) => {
                warn!(
                    backend = %self.backend.name(),
                    language = %language,
                    error = %e,
                    "Translation failed, returning English caption"
                );
                text.to_string()
            }
        }
    }
}
