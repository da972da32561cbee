//! Health and service metadata handlers.

use axum::extract::State;
use axum::Json;

use alttext_core::{HealthResponse, Language, LanguageInfo, LanguagesResponse};

use crate::AppState;

/// Service health, including whether the caption model server answers.
#[utoipa::path(get, path = "/health", tag = "System",
    responses((status = 200, description = "Service health", body = HealthResponse)))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let engine = state.pipeline.engine();
    let model_available = engine.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: engine.model_name().to_string(),
        model_available,
    })
}

/// Languages a caption can be requested in.
#[utoipa::path(get, path = "/languages", tag = "System",
    responses((status = 200, description = "Supported caption languages", body = LanguagesResponse)))]
pub async fn list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: Language::ALL.into_iter().map(LanguageInfo::from).collect(),
    })
}
