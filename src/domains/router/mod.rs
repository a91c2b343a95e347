//! Message router domain - JSON-RPC routing for one connection at a time.
//!
//! ## Architecture
//!
//! - **envelope**: JSON-RPC request/response envelopes and frame classification
//! - **request**: supported methods and their typed parameters
//! - **provider**: the `ToolProvider` seam, implemented by the gateway
//! - **dispatch**: turns one request into exactly one response
//! - **connection**: the cancellable per-connection loop over channel pairs

mod connection;
mod dispatch;
mod envelope;
mod provider;
mod request;

pub use connection::{
    DEFAULT_ROUTER_CAPACITY, MessageRouter, RouterConnection, RouterHandle, RouterState,
};
pub use dispatch::{PROTOCOL_VERSION, ServerIdentity, dispatch};
pub use envelope::{
    InboundMessage, JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId,
};
pub use provider::ToolProvider;
pub use request::{CallToolParams, ClientInfo, InitializeParams, Method, ProtocolRequest};
