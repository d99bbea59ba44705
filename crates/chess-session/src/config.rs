//! Session configuration loaded from `session.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The file parsed but a value is unusable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Connection settings for the persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Base URL of the gateway. Defaults to `http://127.0.0.1:8001`.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    /// Upper bound on any single gateway call, in milliseconds. Defaults to 10000.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:8001".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            gateway_url: default_gateway_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl SessionConfig {
    /// Loads configuration from [`Self::config_path()`].
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] for invalid TOML, or
    /// [`ConfigError::Invalid`] for unusable values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path, with the same rules as [`Self::load()`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config: SessionConfig = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns `session.toml` in the current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("session.toml")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway_url.trim().is_empty() {
            return Err(ConfigError::Invalid("gateway_url is empty".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
