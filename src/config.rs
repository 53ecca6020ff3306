//! Configuration module for the tweetline service.
//!
//! All settings come from environment variables and are read once at startup.

use log::{debug, info, warn};
use std::env;

/// Default request header carrying the authenticated user id.
pub const DEFAULT_ACTOR_HEADER: &str = "x-user-id";

/// Default JSON body limit, in bytes.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 16 * 1024;

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to listen on (`PORT`, default 3000)
    pub port: u16,
    /// PostgreSQL connection string (`DATABASE_URL`). `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Header set by the upstream auth gateway (`ACTOR_HEADER`)
    pub actor_header: String,
    /// Allowed CORS origin (`CORS_ORIGIN`); `*` allows any
    pub cors_origin: Option<String>,
    /// Maximum accepted request body size (`BODY_LIMIT_BYTES`)
    pub body_limit_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            actor_header: DEFAULT_ACTOR_HEADER.to_string(),
            cors_origin: None,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

/// Reduces a connection URL to `scheme://host[:port]/...` for logging.
///
/// Credentials, database name and query are dropped. The host is cut by
/// characters, so multibyte input never splits a code point.
pub fn mask_database_url(url: &str) -> String {
    let (scheme, rest) = match url.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, url),
    };
    let authority = rest.split(|c| c == '/' || c == '?').next().unwrap_or("");
    let host = match authority.rsplit_once('@') {
        Some((_, host)) => host,
        None => authority,
    };
    let host: String = host.chars().take(64).collect();

    match scheme {
        Some(scheme) => format!("{}://{}/...", scheme, host),
        None => format!("{}/...", host),
    }
}

impl AppConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Returns
    ///
    /// - `Ok(AppConfig)`: With defaults applied for unset variables
    /// - `Err(...)`: If a numeric variable cannot be parsed
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error + Send + Sync>>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Loading service configuration");
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = AppConfig::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| format!("PORT must be a valid port number, got '{}': {}", raw, e))?,
            None => defaults.port,
        };

        let database_url = get("DATABASE_URL");
        match &database_url {
            Some(url) => debug!("Database URL (masked): {}", mask_database_url(url)),
            None => warn!("DATABASE_URL is not set - tweets will be kept in memory only"),
        }

        let actor_header = get("ACTOR_HEADER")
            .map(|h| h.trim().to_ascii_lowercase())
            .unwrap_or(defaults.actor_header);

        let cors_origin = get("CORS_ORIGIN");

        let body_limit_bytes = match get("BODY_LIMIT_BYTES") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                format!("BODY_LIMIT_BYTES must be a byte count, got '{}': {}", raw, e)
            })?,
            None => defaults.body_limit_bytes,
        };

        let config = AppConfig {
            port,
            database_url,
            actor_header,
            cors_origin,
            body_limit_bytes,
        };
        info!(
            "Configuration loaded: port {}, actor header '{}', body limit {} bytes",
            config.port, config.actor_header, config.body_limit_bytes
        );
        Ok(config)
    }
}
