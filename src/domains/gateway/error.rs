//! Gateway-specific error types.

use thiserror::Error;

use crate::domains::executor::ExecutionError;
use crate::domains::naming::NamingError;

/// Errors that can occur while serving a list or call request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The tool name could not be decoded.
    #[error(transparent)]
    InvalidToolName(#[from] NamingError),

    /// The executor reported a failure; passed through untouched.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// The remote catalog returned something that is not a tool list.
    #[error("Malformed tool catalog: {0}")]
    MalformedCatalog(String),
}

impl GatewayError {
    /// Whether the error was caused by the caller rather than the executor.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidToolName(_))
    }
}
