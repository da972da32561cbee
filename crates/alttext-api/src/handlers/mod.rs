//! HTTP handlers for alttext-api.

pub mod caption;
pub mod system;

pub use caption::caption_image;
pub use system::{health_check, list_languages};
