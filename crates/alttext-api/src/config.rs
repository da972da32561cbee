//! Server configuration from environment variables.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | HOST | 0.0.0.0 | Bind address |
//! | PORT | 5000 | Bind port |
//! | ALLOWED_ORIGINS | (any) | Comma-separated CORS origin list |
//! | MAX_UPLOAD_BYTES | 20971520 | Request body limit |
//!
//! Backend variables are read by the backends themselves
//! (`OllamaVisionBackend::from_env`, `GoogleTranslateBackend::from_env`).

use std::net::SocketAddr;

use axum::http::HeaderValue;
use tracing::warn;

use alttext_core::{defaults, Error, Result};

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; `None` allows any origin.
    pub allowed_origins: Option<Vec<String>>,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            allowed_origins: None,
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(defaults::ENV_HOST).unwrap_or_else(|| defaults::SERVER_HOST.to_string());

        let port = match lookup(defaults::ENV_PORT) {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("Invalid PORT '{}': {}", v, e)))?,
            None => defaults::SERVER_PORT,
        };

        let max_upload_bytes = match lookup(defaults::ENV_MAX_UPLOAD_BYTES) {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|e| Error::Config(format!("Invalid MAX_UPLOAD_BYTES '{}': {}", v, e)))?,
            None => defaults::MAX_UPLOAD_BYTES,
        };

        let allowed_origins = lookup(defaults::ENV_ALLOWED_ORIGINS)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty() && !origins.iter().any(|o| o == "*"));

        Ok(Self {
            host,
            port,
            allowed_origins,
            max_upload_bytes,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address: {}", e)))
    }

    /// Parsed CORS origins, skipping any that are not valid header values.
    pub fn origin_header_values(&self) -> Option<Vec<HeaderValue>> {
        self.allowed_origins.as_ref().map(|origins| {
            origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(v) => Some(v),
                    Err(e) => {
                        warn!("Invalid CORS origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect()
        })
    }
}
