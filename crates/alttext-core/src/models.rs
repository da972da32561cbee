//! Request and response types for the caption service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::defaults;
use crate::Language;

/// A caption request as parsed from the transport, before validation.
///
/// Every field is optional here; the pipeline decides which absences are
/// errors and which get defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptionRequest {
    /// Raw image bytes, `None` when the client sent no image part at all.
    pub image: Option<Vec<u8>>,
    /// Client-side filename of the image part.
    pub filename: Option<String>,
    /// Requested language code, `None` when absent or blank.
    pub language: Option<String>,
}

impl CaptionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.image = Some(bytes.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the language code. Blank codes are treated as absent.
    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        self.language = if code.trim().is_empty() {
            None
        } else {
            Some(code.trim().to_string())
        };
        self
    }

    /// The requested language code with the default applied.
    pub fn language_or_default(&self) -> &str {
        self.language.as_deref().unwrap_or(defaults::LANGUAGE_CODE)
    }
}

/// Successful caption response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CaptionResponse {
    /// Caption in the requested language, or English on fallback.
    pub caption: String,
}

/// Error response body shared by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// One entry of the supported language listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
}

impl From<Language> for LanguageInfo {
    fn from(lang: Language) -> Self {
        Self {
            code: lang.code().to_string(),
            name: lang.name().to_string(),
        }
    }
}

/// Supported language listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageInfo>,
}

/// Service health report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Caption model name.
    pub model: String,
    /// Whether the model server answered its health check.
    pub model_available: bool,
}
