//! Error types for alttext.

use thiserror::Error;

/// Result type alias using alttext's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for alttext operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No bytes were supplied where an image was expected
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Bytes could not be parsed as any supported image encoding
    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    /// Caption inference failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Translation capability failed
    #[error("Translation error: {0}")]
    Translation(String),

    /// Language code is not in the supported set
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
