//! alttext-api binary.

use std::sync::Arc;

use tracing::info;

use alttext_api::config::ServerConfig;
use alttext_api::telemetry::{self, LogConfig};
use alttext_api::{build_router, AppState, CaptionPipeline};
use alttext_inference::{CaptionEngine, GoogleTranslateBackend, OllamaVisionBackend, Translator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let log_config = LogConfig::from_env();
    let _log_guard = telemetry::init(&log_config);

    info!(
        log_format = if log_config.json { "json" } else { "text" },
        log_file = log_config.file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr()?;

    // Model must be resident before the first request is accepted
    let engine = CaptionEngine::new(Arc::new(OllamaVisionBackend::from_env())).with_env_limit();
    info!(model = %engine.model_name(), "Loading caption model...");
    engine.load().await?;

    let translator = Translator::new(Arc::new(GoogleTranslateBackend::from_env()));
    let pipeline = CaptionPipeline::new(engine, translator);

    info!(
        max_upload_bytes = config.max_upload_bytes,
        cors = if config.allowed_origins.is_some() { "restricted" } else { "any" },
        "Server configured"
    );

    let app = build_router(AppState::new(pipeline), &config);

    // Start server
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
