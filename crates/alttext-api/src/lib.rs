//! alttext-api - HTTP API server for alttext image captions.
//!
//! The router, shared state, and error mapping live here so integration
//! tests can mount the same application the binary serves.

pub mod config;
pub mod handlers;
pub mod pipeline;
pub mod telemetry;

use std::time::Duration;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, Method, Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug, debug_span, warn, Span};
use utoipa::OpenApi;
use uuid::Uuid;

use alttext_core::defaults;
use config::ServerConfig;
pub use pipeline::{CaptionPipeline, PipelineError};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE AND ERRORS
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: CaptionPipeline,
}

impl AppState {
    pub fn new(pipeline: CaptionPipeline) -> Self {
        Self { pipeline }
    }
}

/// HTTP-facing error. Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Internal(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        if err.is_client_error() {
            debug!(error_kind = err.kind(), detail = ?err, "Caption request rejected");
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// OPENAPI
// =============================================================================

/// OpenAPI document served at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "alttext API",
        description = "Accessible image captions from a vision-language model, with optional translation"
    ),
    paths(
        handlers::caption::caption_image,
        handlers::system::health_check,
        handlers::system::list_languages,
    ),
    components(schemas(
        alttext_core::CaptionResponse,
        alttext_core::ErrorResponse,
        alttext_core::HealthResponse,
        alttext_core::LanguageInfo,
        alttext_core::LanguagesResponse,
    )),
    tags(
        (name = "Caption", description = "Image captioning"),
        (name = "System", description = "Health checks and service info"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// =============================================================================
// ROUTER
// =============================================================================

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(defaults::CORS_MAX_AGE_SECS));

    match config.origin_header_values() {
        Some(origins) if !origins.is_empty() => cors.allow_origin(AllowOrigin::list(origins)),
        Some(_) => {
            warn!("No valid CORS origins configured, allowing any origin");
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    }
}

/// Per-request span carrying the correlation ID set by `SetRequestIdLayer`.
fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    debug_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id
    )
}

/// Build the application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/caption", post(handlers::caption_image))
        .route("/health", get(handlers::health_check))
        .route("/languages", get(handlers::list_languages))
        .route("/openapi.json", get(openapi_json))
        // Middleware
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(config))
        .layer(CatchPanicLayer::new())
        // Over-limit bodies surface as multipart read errors, see handlers::caption
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state)
}
