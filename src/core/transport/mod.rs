//! Transports carrying MCP traffic to the bridge.
//!
//! - **STDIO**: rmcp drives the session over stdin/stdout - feature: `stdio`
//! - **TCP**: newline-delimited JSON-RPC, one message router per connection - feature: `tcp`
//! - **HTTP**: one JSON-RPC envelope per POST, answered by single-envelope dispatch - feature: `http`
//!
//! Every transport answers through the same gateway held by `BridgeServer`.
//!
//! # Feature Flags
//!
//! - `stdio` (default): STDIO transport - minimal dependencies
//! - `tcp`: TCP transport - adds tokio/net
//! - `http`: HTTP transport - adds axum, tower, tower-http

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

// Re-export configs for convenience
#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
