//! # alttext-core
//!
//! Core types, traits, and abstractions for the alttext caption service.
//!
//! This crate provides the request and response data structures, the
//! image decoder, the supported language table, and the capability traits
//! that the inference crate implements and the API crate consumes.

pub mod defaults;
pub mod error;
pub mod decoder;
pub mod language;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use decoder::{decode, DecodedImage};
pub use language::Language;
pub use models::*;
pub use traits::*;
