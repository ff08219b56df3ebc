//! Application configuration

use std::env;
use std::net::SocketAddr;

use axum::http::HeaderValue;

/// Default listen address
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Default browser origin allowed to open the WebSocket
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: SocketAddr,
    pub allowed_origins: AllowedOrigins,

    // Logging
    pub log_format: LogFormat,
}

/// Origins permitted by the CORS layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_address
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddress(bind_address))?;

        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
        )?;

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            "pretty" | "" => LogFormat::Pretty,
            other => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        };

        Ok(Self {
            bind_address,
            allowed_origins,
            log_format,
        })
    }
}

/// Parse a comma-separated origin list; `*` anywhere allows every origin
fn parse_origins(raw: &str) -> Result<AllowedOrigins, ConfigError> {
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if entries.contains(&"*") {
        return Ok(AllowedOrigins::Any);
    }
    if entries.is_empty() {
        return Err(ConfigError::InvalidOrigin(raw.to_string()));
    }

    entries
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(AllowedOrigins::List)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDRESS: {0}")]
    InvalidBindAddress(String),
    #[error("Invalid origin in ALLOWED_ORIGINS: {0:?}")]
    InvalidOrigin(String),
    #[error("Invalid LOG_FORMAT (expected pretty or json): {0}")]
    InvalidLogFormat(String),
}
