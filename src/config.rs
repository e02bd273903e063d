//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DOWNLOAD_DIR: &str = ".";

/// Errors produced while assembling a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("config parse failed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeouts: Timeouts,
    pub download_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeouts: Timeouts::default(),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `BISTRO_API_BASE_URL`: default `http://localhost:5000/api`
    /// - `BISTRO_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BISTRO_CONNECT_TIMEOUT_SECS`: default 10
    /// - `BISTRO_DOWNLOAD_DIR`: default `.`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an `http(s)` URL or a timeout
    /// is set but not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("BISTRO_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
        let timeouts = Timeouts {
            request_secs: env_parse_u64("BISTRO_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_u64("BISTRO_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let download_dir = std::env::var("BISTRO_DOWNLOAD_DIR").unwrap_or_else(|_| DEFAULT_DOWNLOAD_DIR.to_owned());

        Self::default()
            .with_base_url(&base_url)
            .map(|cfg| Self { timeouts, download_dir: PathBuf::from(download_dir), ..cfg })
    }

    /// Replace the base URL, validating the scheme and trimming trailing slashes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for anything that is not `http(s)://`.
    pub fn with_base_url(self, raw: &str) -> Result<Self, ConfigError> {
        Ok(Self { base_url: normalize_base_url(raw)?, ..self })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| ConfigError::InvalidBaseUrl(raw.to_owned()))?;
    if host.is_empty() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn env_parse_u64(key: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Parse(format!("{key} must be a whole number of seconds, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
