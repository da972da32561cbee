//! Ollama vision backend for image captioning.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use alttext_core::defaults;
use alttext_core::{CaptionBackend, DecodedImage, Error, Result};

/// Ollama-based vision backend (e.g., llava, moondream, qwen2.5vl).
pub struct OllamaVisionBackend {
    base_url: String,
    model: String,
    prompt: String,
    client: reqwest::Client,
    timeout_secs: u64,
    load_timeout_secs: u64,
}

impl OllamaVisionBackend {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            prompt: defaults::CAPTION_PROMPT.to_string(),
            client: reqwest::Client::new(),
            timeout_secs: defaults::CAPTION_TIMEOUT_SECS,
            load_timeout_secs: defaults::MODEL_LOAD_TIMEOUT_SECS,
        }
    }

    /// Override the prompt sent with every image.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Override the per-caption request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Create from environment variables.
    ///
    /// Reads `OLLAMA_BASE` (or `OLLAMA_URL`), `CAPTION_MODEL`,
    /// `CAPTION_PROMPT` and `CAPTION_TIMEOUT_SECS`, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let base_url = std::env::var(defaults::ENV_OLLAMA_BASE)
            .or_else(|_| std::env::var(defaults::ENV_OLLAMA_URL))
            .unwrap_or_else(|_| defaults::OLLAMA_URL.to_string());
        let model = std::env::var(defaults::ENV_CAPTION_MODEL)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| defaults::CAPTION_MODEL.to_string());
        let timeout_secs = std::env::var(defaults::ENV_CAPTION_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::CAPTION_TIMEOUT_SECS);

        let mut backend = Self::new(base_url, model).with_timeout_secs(timeout_secs);
        if let Ok(prompt) = std::env::var(defaults::ENV_CAPTION_PROMPT) {
            if !prompt.trim().is_empty() {
                backend = backend.with_prompt(prompt);
            }
        }

        info!(
            "Initializing Ollama vision backend: url={}, model={}, timeout={}s",
            backend.base_url, backend.model, backend.timeout_secs
        );
        backend
    }
}

#[derive(Serialize)]
struct OllamaGenerateRequest {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>, // base64 encoded
    stream: bool,
    keep_alive: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

/// Sampling options; temperature 0 and top_k 1 give greedy decoding.
#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_k: u32,
}

impl GenerateOptions {
    fn greedy() -> Self {
        Self {
            temperature: 0.0,
            top_k: 1,
        }
    }
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
}

impl OllamaVisionBackend {
    async fn post_generate(
        &self,
        request: &OllamaGenerateRequest,
        timeout_secs: u64,
    ) -> Result<OllamaGenerateResponse> {
        let url = format!("{}/api/generate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .timeout(Duration::from_secs(timeout_secs))
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Vision request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Vision API returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse vision response: {}", e)))
    }
}

#[async_trait]
impl CaptionBackend for OllamaVisionBackend {
    async fn generate_caption(&self, image: &DecodedImage) -> Result<String> {
        let png = image.to_png()?;
        let image_b64 = base64::engine::general_purpose::STANDARD.encode(&png);

        let request = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: Some(self.prompt.clone()),
            images: vec![image_b64],
            stream: false,
            keep_alive: defaults::MODEL_KEEP_ALIVE,
            options: Some(GenerateOptions::greedy()),
        };

        let result = self.post_generate(&request, self.timeout_secs).await?;
        if !result.done {
            return Err(Error::Inference(
                "Vision model returned an incomplete response".into(),
            ));
        }

        trace!(model = %self.model, response = %result.response, "Raw vision output");
        Ok(result.response)
    }

    /// Ask Ollama to load the model into memory.
    ///
    /// A generate call without a prompt only loads the model; it returns
    /// once the weights are resident.
    async fn load(&self) -> Result<()> {
        debug!(model = %self.model, "Loading vision model");
        let request = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: None,
            images: Vec::new(),
            stream: false,
            keep_alive: defaults::MODEL_KEEP_ALIVE,
            options: None,
        };

        let result = self.post_generate(&request, self.load_timeout_secs).await?;
        if !result.done {
            return Err(Error::Inference(format!(
                "Model {} did not finish loading",
                self.model
            )));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
