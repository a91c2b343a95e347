//! Error types and handling for the bridge.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and external dependencies, providing consistent error handling
//! across the entire application.

use thiserror::Error;

use super::transport::TransportError;
use crate::domains::catalog::CatalogError;
use crate::domains::executor::ExecutionError;
use crate::domains::gateway::GatewayError;
use crate::domains::naming::NamingError;

/// A specialized Result type for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the bridge.
#[derive(Debug, Error)]
pub enum Error {
    /// Service registration failed; the catalog must not serve traffic.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error raised while answering a list or call request.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Error reported by an operation executor.
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Tool or service name policy violation.
    #[error("Naming error: {0}")]
    Naming(#[from] NamingError),

    /// Transport failure (bind, serve, protocol).
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
