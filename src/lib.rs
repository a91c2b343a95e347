//! MCP Operation Bridge
//!
//! Exposes the operations of registered services as MCP tools. A client
//! lists tools and calls them by name; the bridge maps each tool name back
//! to a `(service, operation)` pair and forwards the call to an operation
//! executor, either in-process or over HTTP.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the rmcp server handler and transports
//! - **domains**: the bridge itself
//!   - **naming**: tool name encoding and decoding
//!   - **catalog**: service registration and tool descriptors
//!   - **executor**: operation execution, local or remote
//!   - **gateway**: MCP list/call on top of an executor
//!   - **router**: JSON-RPC envelope routing for raw transports
//!   - **services**: built-in example services
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mcp_operation_bridge::core::{BridgeServer, Config};
//! use mcp_operation_bridge::domains::gateway::Gateway;
//! use mcp_operation_bridge::domains::services::local_executor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let scheme = config.bridge.naming;
//!     let gateway = Gateway::new(Arc::new(local_executor(scheme)?), scheme);
//!     let server = BridgeServer::new(config, gateway);
//!     for tool in server.tools().await? {
//!         println!("{}", tool.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{BridgeServer, Config, Error, Result};
