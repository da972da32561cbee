//! # alttext-inference
//!
//! Caption model and translation backends for alttext.
//!
//! This crate provides:
//! - Ollama vision backend for English captions
//! - Control-token stripping for raw model output
//! - [`CaptionEngine`], the shared, optionally rate-limited caption capability
//! - Google Translate backend and the [`Translator`] with identity and
//!   English-fallback rules
//! - In-memory mock backends (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use alttext_inference::{CaptionEngine, OllamaVisionBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = CaptionEngine::new(Arc::new(OllamaVisionBackend::from_env()));
//!     engine.load().await.unwrap();
//!     let image = alttext_inference::decode(&std::fs::read("dog.jpg").unwrap()).unwrap();
//!     println!("{}", engine.caption(&image).await.unwrap());
//! }
//! ```

pub mod engine;
pub mod tokens;
pub mod translation;
pub mod vision;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use alttext_core::*;

pub use engine::CaptionEngine;
pub use tokens::strip_control_tokens;
pub use translation::{GoogleTranslateBackend, Translator};
pub use vision::OllamaVisionBackend;
