//! Caption HTTP handler.
//!
//! Accepts an uploaded image and returns an English or translated caption
//! produced by the configured vision model.

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use alttext_core::{defaults, CaptionRequest, CaptionResponse};

use crate::{ApiError, AppState};

/// Caption an uploaded image.
///
/// # Multipart Fields
/// - `image`: Image file (required). PNG, JPEG, GIF, WebP or BMP.
/// - `language`: Caption language, one of `en`, `hi`, `te`, `ta` (optional, default `en`)
///
/// # Returns
/// - 200 OK with `{"caption": "..."}`
/// - 400 Bad Request if the image is missing, empty, or not decodable
/// - 413 Payload Too Large if the upload exceeds `MAX_UPLOAD_BYTES`
/// - 500 Internal Server Error if the caption model fails
#[utoipa::path(post, path = "/caption", tag = "Caption",
    responses(
        (status = 200, description = "Caption generated", body = CaptionResponse),
        (status = 400, description = "Missing, empty, or invalid image", body = alttext_core::ErrorResponse),
        (status = 413, description = "Upload exceeds the size limit", body = alttext_core::ErrorResponse),
        (status = 500, description = "Caption generation failed", body = alttext_core::ErrorResponse),
    ))]
pub async fn caption_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CaptionResponse>, ApiError> {
    let request = match multipart {
        Ok(multipart) => parse_caption_request(multipart).await?,
        Err(rejection) => {
            // Not a multipart body at all, so there is no image part
            debug!(error = %rejection, "Caption request is not multipart");
            CaptionRequest::new()
        }
    };

    let caption = state.pipeline.run(request).await?;
    Ok(Json(CaptionResponse { caption }))
}

/// Read the multipart form into a typed request. Unknown fields are ignored.
async fn parse_caption_request(mut multipart: Multipart) -> Result<CaptionRequest, ApiError> {
    let mut request = CaptionRequest::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Malformed multipart body"))?
    {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some(defaults::FIELD_IMAGE) => {
                if let Some(filename) = field.file_name() {
                    request = request.with_filename(filename);
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, "Failed to read image part"))?;
                request = request.with_image(bytes.to_vec());
            }
            Some(defaults::FIELD_LANGUAGE) => {
                let code = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, "Failed to read language part"))?;
                request = request.with_language(code);
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(request)
}

/// Map a multipart read failure. The body limit shows up here as a 413.
fn multipart_error(err: MultipartError, context: &'static str) -> ApiError {
    debug!(error = %err, status = %err.status(), "{}", context);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Image exceeds upload limit".into())
    } else {
        ApiError::BadRequest("Invalid multipart request".into())
    }
}
