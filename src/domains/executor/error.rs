//! Execution error types.

use std::time::Duration;
use thiserror::Error;

/// Errors reported by an operation executor.
///
/// These are passed through the bridge as-is; the gateway never reinterprets
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// No service with this name is known to the executor.
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// The service exists but has no such operation.
    #[error("Operation not found: {service}/{operation}")]
    OperationNotFound { service: String, operation: String },

    /// The input could not be decoded into the operation's input type.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The operation handler ran and failed.
    #[error("Operation failed: {0}")]
    Failed(String),

    /// The remote endpoint answered with a non-success status.
    #[error("Remote endpoint returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// The remote endpoint could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The operation did not complete in time.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The operation result could not be encoded or decoded.
    #[error("Malformed operation result: {0}")]
    MalformedResult(String),
}

impl ExecutionError {
    /// Create an "operation not found" error.
    pub fn operation_not_found(service: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::OperationNotFound {
            service: service.into(),
            operation: operation.into(),
        }
    }

    /// Create an "invalid input" error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a "failed" error.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Create a "transport" error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
