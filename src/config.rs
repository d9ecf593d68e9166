// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Token values here are only the seed: a token file written by an earlier
//! refresh takes priority (see `services::credentials`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default Strety API base URL.
pub const DEFAULT_API_BASE: &str = "https://2.strety.com/api/v1";

/// Name of the persisted token file inside the config directory.
pub const TOKEN_FILE_NAME: &str = "token.json";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strety API base URL (no trailing slash)
    pub api_base: String,
    /// Directory holding the persisted token file
    pub config_dir: PathBuf,
    /// Bind host for the tool channel
    pub host: String,
    /// Bind port for the tool channel
    pub port: u16,
    /// Per-request timeout for Strety calls
    pub http_timeout: Duration,

    // --- Credentials (seed values) ---
    /// OAuth client ID, required for refresh
    pub client_id: Option<String>,
    /// OAuth client secret, required for refresh
    pub client_secret: Option<String>,
    /// Seed access token
    pub access_token: Option<String>,
    /// Seed refresh token
    pub refresh_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let config_dir = match non_empty_var("STRETY_CONFIG_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => {
                let home = non_empty_var("HOME").ok_or(ConfigError::Missing("HOME"))?;
                PathBuf::from(home).join(".mcp-strety")
            }
        };

        let timeout_secs = match non_empty_var("STRETY_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("STRETY_HTTP_TIMEOUT_SECS", raw))?,
            None => 30,
        };

        Ok(Self {
            api_base: non_empty_var("STRETY_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            config_dir,
            host: non_empty_var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8787".to_string())
                .parse()
                .unwrap_or(8787),
            http_timeout: Duration::from_secs(timeout_secs),
            client_id: non_empty_var("STRETY_CLIENT_ID"),
            client_secret: non_empty_var("STRETY_CLIENT_SECRET"),
            access_token: non_empty_var("STRETY_ACCESS_TOKEN"),
            refresh_token: non_empty_var("STRETY_REFRESH_TOKEN"),
        })
    }

    /// Config for tests, pointing at a local API and a scratch directory.
    pub fn test_default() -> Self {
        Self {
            api_base: "http://127.0.0.1:9".to_string(),
            config_dir: env::temp_dir().join("strety-bridge-test"),
            host: "127.0.0.1".to_string(),
            port: 0,
            http_timeout: Duration::from_secs(5),
            client_id: Some("test_client_id".to_string()),
            client_secret: Some("test_client_secret".to_string()),
            access_token: Some("test_access".to_string()),
            refresh_token: Some("test_refresh".to_string()),
        }
    }

    /// Location of the persisted token file.
    pub fn token_path(&self) -> PathBuf {
        self.config_dir.join(TOKEN_FILE_NAME)
    }

    /// OAuth token endpoint used for refresh exchanges.
    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth/token", self.api_base)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
