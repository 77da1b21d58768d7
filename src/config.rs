//! Service Configuration
//!
//! JSON config file; every field has a default so an absent file or an
//! empty object yields a runnable service.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::DEFAULT_TOKEN_TTL_HOURS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// HS256 signing secret; generated at startup when absent
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Token lifetime in hours (default: 72)
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    /// Snapshot file for the durable store; in-memory when absent
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Log output format (default: json)
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_token_ttl_hours() -> i64 {
    DEFAULT_TOKEN_TTL_HOURS
}

fn default_log_format() -> LogFormat {
    LogFormat::Json
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            jwt_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
            data_file: None,
            log_format: default_log_format(),
        }
    }
}

impl ServiceConfig {
    /// Load and validate the config at `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ServiceConfig = serde_json::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be > 0".to_string()));
        }

        if self.token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid(
                "token_ttl_hours must be > 0".to_string(),
            ));
        }

        if let Some(secret) = &self.jwt_secret {
            if secret.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "jwt_secret must not be empty when set".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
