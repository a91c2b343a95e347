//! Configuration management for the bridge.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::transport::TransportConfig;
use crate::domains::naming::{NamingError, NamingScheme};
use crate::domains::router::{DEFAULT_ROUTER_CAPACITY, ServerIdentity};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Default timeout for a single remote operation.
pub const DEFAULT_EXECUTOR_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for the bridge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Tool naming and operation execution.
    pub bridge: BridgeConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Bridge behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// How (service, operation) pairs map to tool names.
    pub naming: NamingScheme,

    /// Base URL of a remote operation endpoint. `None` serves the built-in
    /// services in-process.
    pub executor_endpoint: Option<String>,

    /// Upper bound for a single remote operation, in seconds.
    pub executor_timeout_secs: u64,

    /// Channel capacity of each router connection.
    pub router_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            naming: NamingScheme::default(),
            executor_endpoint: None,
            executor_timeout_secs: DEFAULT_EXECUTOR_TIMEOUT_SECS,
            router_capacity: DEFAULT_ROUTER_CAPACITY,
        }
    }
}

impl LoggingConfig {
    /// Load `MCP_LOG_LEVEL` and `MCP_LOG_TIMESTAMPS`.
    ///
    /// Reads nothing else, so the subscriber can be installed before the
    /// rest of the configuration is parsed and its warnings are not lost.
    pub fn from_env() -> Self {
        let mut logging = Self::default();

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            logging.with_timestamps =
                !matches!(timestamps.trim().to_lowercase().as_str(), "false" | "0" | "no");
        }

        logging
    }
}

impl BridgeConfig {
    pub fn executor_timeout(&self) -> Duration {
        Duration::from_secs(self.executor_timeout_secs)
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity reported to clients on `initialize`.
    pub fn identity(&self) -> ServerIdentity {
        ServerIdentity::new(&self.server.name, &self.server.version)
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_NAMING_SCHEME`. Invalid numeric
    /// values are logged and replaced by their defaults; an invalid naming
    /// scheme is an error, since it would change every tool name.
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config.bridge = BridgeConfig::from_env()?;

        Ok(config)
    }
}

impl BridgeConfig {
    /// Load the bridge section from `MCP_NAMING_*`, `MCP_EXECUTOR_*` and
    /// `MCP_ROUTER_CAPACITY`.
    ///
    /// Fails when the naming scheme or separator is invalid.
    pub fn from_env() -> Result<Self, NamingError> {
        let mut bridge = Self::default();

        if let Ok(scheme) = std::env::var("MCP_NAMING_SCHEME") {
            let separator = std::env::var("MCP_NAMING_SEPARATOR")
                .ok()
                .and_then(|s| s.chars().next());
            bridge.naming = NamingScheme::from_name(&scheme, separator)?;
        } else if let Ok(separator) = std::env::var("MCP_NAMING_SEPARATOR") {
            match separator.chars().next() {
                Some(c) => bridge.naming = NamingScheme::lossless(c)?,
                None => warn!("Ignoring empty MCP_NAMING_SEPARATOR"),
            }
        }

        if let Ok(endpoint) = std::env::var("MCP_EXECUTOR_ENDPOINT") {
            let endpoint = endpoint.trim();
            if !endpoint.is_empty() {
                info!("Forwarding operations to {}", endpoint);
                bridge.executor_endpoint = Some(endpoint.to_string());
            }
        }

        if let Ok(timeout) = std::env::var("MCP_EXECUTOR_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => bridge.executor_timeout_secs = secs,
                _ => warn!(
                    "Invalid MCP_EXECUTOR_TIMEOUT_SECS '{}', using {}",
                    timeout, DEFAULT_EXECUTOR_TIMEOUT_SECS
                ),
            }
        }

        if let Ok(capacity) = std::env::var("MCP_ROUTER_CAPACITY") {
            match capacity.parse::<usize>() {
                Ok(n) if n > 0 => bridge.router_capacity = n,
                _ => warn!(
                    "Invalid MCP_ROUTER_CAPACITY '{}', using {}",
                    capacity, DEFAULT_ROUTER_CAPACITY
                ),
            }
        }

        Ok(bridge)
    }
}
