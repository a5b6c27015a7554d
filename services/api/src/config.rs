//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_NEWS_QUERY: &str =
    r#"startup OR "artificial intelligence" OR fintech OR "climate tech" OR blockchain"#;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Without a database the service keeps records in memory.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub news_api_key: Option<String>,
    pub news_api_url: String,
    pub news_query: String,
    pub news_page_size: u32,
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub http_timeout: Duration,
    /// `None` allows any origin.
    pub cors_allow_origin: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // --- Server, logging and storage ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = var("DATABASE_URL");

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- News source ---
        let news_api_key = var("NEWS_API_KEY");
        let news_api_url =
            var("NEWS_API_URL").unwrap_or_else(|| "https://newsapi.org/v2/everything".to_string());
        let news_query = var("NEWS_QUERY").unwrap_or_else(|| DEFAULT_NEWS_QUERY.to_string());
        let news_page_size = match var("NEWS_PAGE_SIZE") {
            Some(raw) => parse_page_size(&raw)?,
            None => 50,
        };

        // --- Generative model ---
        let gemini_api_key = var("GEMINI_API_KEY");
        let gemini_api_base = var("GEMINI_API_BASE")
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string());
        let gemini_model = var("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-flash".to_string());

        // --- Outbound HTTP and CORS ---
        let http_timeout_secs = match var("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "HTTP_TIMEOUT_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", raw),
                )
            })?,
            None => 15,
        };
        let cors_allow_origin = var("CORS_ALLOW_ORIGIN").filter(|o| o.trim() != "*");

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            news_api_key,
            news_api_url,
            news_query,
            news_page_size,
            gemini_api_key,
            gemini_api_base,
            gemini_model,
            http_timeout: Duration::from_secs(http_timeout_secs),
            cors_allow_origin,
        })
    }
}

fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| (1..=100).contains(n))
        .ok_or_else(|| {
            ConfigError::InvalidValue(
                "NEWS_PAGE_SIZE".to_string(),
                format!("'{}' is not between 1 and 100", raw),
            )
        })
}
