//! Catalog-specific error types.

use thiserror::Error;

use crate::domains::naming::NamingError;

/// Errors that can occur while registering a service.
///
/// Any of these aborts the whole registration; the catalog is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The service name or a composed tool name violates the naming policy.
    #[error(transparent)]
    NamingConflict(#[from] NamingError),

    /// The registration target is not a usable service definition.
    #[error("Not a service: {name}: {reason}")]
    NotAService { name: String, reason: String },
}

impl CatalogError {
    /// Create a "not a service" error.
    pub fn not_a_service(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotAService {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
