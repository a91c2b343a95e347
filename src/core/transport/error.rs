//! Transport error types.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that stop a transport.
///
/// Per-connection and per-request failures are logged and never surface
/// here; only listener and session setup failures do.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The listener could not bind its address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The rmcp session could not be established.
    #[error("Server initialization error: {0}")]
    InitError(String),

    /// The HTTP server stopped with an error.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The rmcp session ended with an error.
    #[error("Service error: {0}")]
    ServiceError(String),
}

impl TransportError {
    /// Create a bind error.
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::BindError {
            address: address.into(),
            source,
        }
    }

    /// Create an initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::InitError(msg.into())
    }

    /// Create an HTTP error.
    pub fn http(msg: impl Into<String>) -> Self {
        Self::HttpError(msg.into())
    }
}
