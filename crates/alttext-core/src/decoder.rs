//! Image decoding and normalization.
//!
//! Uploaded bytes are sniffed for their encoding, decoded, and normalized to
//! 8-bit RGB so the caption engine always receives the same pixel layout
//! regardless of whether the client sent a grayscale PNG, a palette GIF, or a
//! JPEG.

use std::io::Cursor;

use image::{ImageFormat, ImageReader, RgbImage};
use tracing::debug;

use crate::{Error, Result};

/// An uploaded image normalized to 3-channel RGB8.
///
/// Owned by the request that decoded it and dropped once a caption exists.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: RgbImage,
    source_format: ImageFormat,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Encoding the upload arrived in.
    pub fn source_format(&self) -> ImageFormat {
        self.source_format
    }

    /// Normalized pixel buffer.
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Re-encode the normalized pixels as PNG for transport to a model server.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| Error::Internal(format!("Failed to encode image: {}", e)))?;
        Ok(buf)
    }
}

/// Decode raw upload bytes into a normalized RGB image.
///
/// Returns [`Error::EmptyInput`] for a zero-length payload and
/// [`Error::InvalidImageFormat`] when the bytes are not a supported image.
pub fn decode(raw: &[u8]) -> Result<DecodedImage> {
    if raw.is_empty() {
        return Err(Error::EmptyInput("no image bytes supplied".into()));
    }

    let reader = ImageReader::new(Cursor::new(raw)).with_guessed_format()?;
    let source_format = reader.format().ok_or_else(|| {
        Error::InvalidImageFormat(format!(
            "unrecognized encoding (detected {})",
            detect_mime(raw)
        ))
    })?;

    let image = reader
        .decode()
        .map_err(|e| Error::InvalidImageFormat(format!("{:?}: {}", source_format, e)))?;

    let pixels = image.into_rgb8();
    debug!(
        format = ?source_format,
        width = pixels.width(),
        height = pixels.height(),
        "Image decoded"
    );

    Ok(DecodedImage {
        pixels,
        source_format,
    })
}

/// Best-effort MIME type from magic bytes, for diagnostics only.
fn detect_mime(raw: &[u8]) -> &'static str {
    infer::get(raw)
        .map(|kind| kind.mime_type())
        .unwrap_or("unknown")
}
