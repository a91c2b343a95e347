//! Gateway domain module.
//!
//! The gateway is the outward-facing entry point: it answers `list_tools` and
//! `call_tool` for an MCP server by forwarding both to an operation executor.
//! It holds no catalog of its own; tool discovery runs the catalog's
//! `MCP/ListTools` operation remotely.
//!
//! ## Architecture
//!
//! - `proxy.rs` - `Gateway` (list / call)
//! - `result.rs` - Shaping raw operation results into `CallToolResult`s
//! - `error.rs` - Gateway error types

mod error;
mod proxy;
mod result;

pub use error::GatewayError;
pub use proxy::Gateway;
pub use result::{error_result, into_call_tool_result};
