//! Executor domain module.
//!
//! The operation executor is what actually runs a named operation of a named
//! service. The bridge only addresses and forwards calls; this module defines
//! the seam it forwards through and two implementations of it.
//!
//! ## Architecture
//!
//! - `request.rs` - `OperationExecutor` trait, request and context types
//! - `handler.rs` - `ServiceHandler`: a service descriptor plus its handlers
//! - `local.rs` - `LocalExecutor`: runs `ServiceHandler`s in-process
//! - `http.rs` - `HttpExecutor`: forwards to a remote endpoint over HTTP
//! - `error.rs` - Execution error types

mod error;
mod handler;
mod http;
mod local;
mod request;

pub use error::ExecutionError;
pub use handler::{OperationFn, OperationFuture, ServiceHandler, ServiceHandlerBuilder};
pub use http::{HttpExecutor, REQUEST_ID_HEADER};
pub use local::LocalExecutor;
pub use request::{OperationContext, OperationExecutor, OperationRequest};
