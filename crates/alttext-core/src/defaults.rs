//! Centralized default constants for the alttext service.
//!
//! All crates reference these constants instead of defining their own
//! magic numbers. Environment variable names live next to the default
//! they override.

// =============================================================================
// SERVER
// =============================================================================

/// Default bind address.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 5000;

/// Maximum accepted request body (20 MiB).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// CORS preflight cache duration.
pub const CORS_MAX_AGE_SECS: u64 = 3600;

pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
pub const ENV_MAX_UPLOAD_BYTES: &str = "MAX_UPLOAD_BYTES";

// =============================================================================
// CAPTIONING
// =============================================================================

/// Default Ollama endpoint.
pub const OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default vision-language model used for captions.
pub const CAPTION_MODEL: &str = "llava:7b";

/// Prompt sent alongside every image.
pub const CAPTION_PROMPT: &str =
    "Write a single short sentence describing this image for a visually impaired reader.";

/// Timeout for a caption request (seconds).
pub const CAPTION_TIMEOUT_SECS: u64 = 120;

/// Timeout for the startup model load (seconds). Cold loads of large models are slow.
pub const MODEL_LOAD_TIMEOUT_SECS: u64 = 600;

/// Keep the model resident indefinitely once loaded.
pub const MODEL_KEEP_ALIVE: i64 = -1;

pub const ENV_OLLAMA_BASE: &str = "OLLAMA_BASE";
pub const ENV_OLLAMA_URL: &str = "OLLAMA_URL";
pub const ENV_CAPTION_MODEL: &str = "CAPTION_MODEL";
pub const ENV_CAPTION_PROMPT: &str = "CAPTION_PROMPT";
pub const ENV_CAPTION_TIMEOUT_SECS: &str = "CAPTION_TIMEOUT_SECS";
pub const ENV_CAPTION_MAX_CONCURRENT: &str = "CAPTION_MAX_CONCURRENT";

// =============================================================================
// TRANSLATION
// =============================================================================

/// Google Translate web endpoint.
pub const TRANSLATE_BASE_URL: &str = "https://translate.googleapis.com";

/// Timeout for a translation request (seconds).
pub const TRANSLATE_TIMEOUT_SECS: u64 = 10;

pub const ENV_TRANSLATE_BASE_URL: &str = "TRANSLATE_BASE_URL";
pub const ENV_TRANSLATE_TIMEOUT_SECS: &str = "TRANSLATE_TIMEOUT_SECS";

// =============================================================================
// REQUEST
// =============================================================================

/// Language applied when a request does not name one.
pub const LANGUAGE_CODE: &str = "en";

/// Multipart field carrying the image.
pub const FIELD_IMAGE: &str = "image";

/// Multipart field carrying the language code.
pub const FIELD_LANGUAGE: &str = "language";
