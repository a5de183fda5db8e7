//! Server configuration.
//!
//! Values come from an optional TOML file; command-line flags override
//! whatever the file provides.

use crate::error::ConfigError;
use derive_getters::Getters;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 12345;

/// Listen configuration for the session server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Deserialize)]
pub struct ServerConfig {
    /// Host or IP address to bind.
    #[serde(default = "default_host")]
    host: String,

    /// TCP port to bind. `0` picks a free port.
    #[serde(default = "default_port")]
    port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl ServerConfig {
    /// Creates a configuration for the given address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// `host:port` string suitable for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(default_host(), default_port())
    }
}
