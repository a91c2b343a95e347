//! Transport configuration types.

use serde::{Deserialize, Serialize};
#[cfg(any(feature = "tcp", feature = "http"))]
use tracing::warn;

/// Which transport carries MCP traffic to the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// rmcp-driven session over stdin/stdout.
    #[cfg(feature = "stdio")]
    Stdio,

    /// Newline-delimited JSON-RPC over TCP, one message router per connection.
    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),

    /// One JSON-RPC envelope per HTTP POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// TCP transport configuration.
#[cfg(feature = "tcp")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpConfig {
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Path of the JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Allow any origin, for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(feature = "tcp")]
const DEFAULT_TCP_PORT: u16 = 3000;

#[cfg(feature = "http")]
const DEFAULT_HTTP_PORT: u16 = 8080;

#[cfg(any(feature = "tcp", feature = "http"))]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

/// Read a port from `var`, warning and falling back on garbage.
#[cfg(any(feature = "tcp", feature = "http"))]
fn port_from_env(var: &str, default: u16) -> u16 {
    match std::env::var(var) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} '{}', using {}", var, value, default);
            default
        }),
        Err(_) => default,
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            return Self::Stdio;
        }

        #[cfg(all(not(feature = "stdio"), feature = "tcp"))]
        {
            return Self::Tcp(TcpConfig::default());
        }

        #[cfg(all(not(feature = "stdio"), not(feature = "tcp"), feature = "http"))]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(not(any(feature = "stdio", feature = "tcp", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio, tcp, or http");
        }
    }
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_TCP_PORT,
            host: default_host(),
        }
    }
}

#[cfg(feature = "tcp")]
impl TcpConfig {
    /// Load from `MCP_TCP_PORT` and `MCP_TCP_HOST`.
    pub fn from_env() -> Self {
        Self {
            port: port_from_env("MCP_TCP_PORT", DEFAULT_TCP_PORT),
            host: std::env::var("MCP_TCP_HOST").unwrap_or_else(|_| default_host()),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    /// Load from `MCP_HTTP_PORT`, `MCP_HTTP_HOST`, `MCP_HTTP_PATH` and
    /// `MCP_HTTP_CORS`. A path without a leading slash gets one.
    pub fn from_env() -> Self {
        let mut rpc_path = std::env::var("MCP_HTTP_PATH").unwrap_or_else(|_| default_rpc_path());
        if !rpc_path.starts_with('/') {
            rpc_path.insert(0, '/');
        }

        Self {
            port: port_from_env("MCP_HTTP_PORT", DEFAULT_HTTP_PORT),
            host: std::env::var("MCP_HTTP_HOST").unwrap_or_else(|_| default_host()),
            rpc_path,
            enable_cors: std::env::var("MCP_HTTP_CORS")
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or_else(|_| default_cors()),
        }
    }
}

impl TransportConfig {
    /// Load from `MCP_TRANSPORT` (`stdio`, `tcp` or `http`) and the
    /// transport-specific variables.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "tcp")]
            "tcp" => Self::Tcp(TcpConfig::from_env()),
            #[cfg(feature = "http")]
            "http" => Self::Http(HttpConfig::from_env()),
            _ => Self::default(),
        }
    }

    /// Short description for the startup log.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (rmcp session)".to_string(),
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => format!("TCP on {}:{} (line-delimited JSON-RPC)", cfg.host, cfg.port),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}:{}{}", cfg.host, cfg.port, cfg.rpc_path),
        }
    }

    pub fn is_stdio(&self) -> bool {
        #[cfg(feature = "stdio")]
        {
            matches!(self, Self::Stdio)
        }
        #[cfg(not(feature = "stdio"))]
        {
            false
        }
    }
}
