//! Naming-specific error types.

use thiserror::Error;

/// Errors produced while encoding or decoding tool names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// A service name or composed tool name violates the naming policy, or
    /// collides with a name that is already taken.
    #[error("Naming conflict for '{name}': {reason}")]
    NamingConflict { name: String, reason: String },

    /// A tool name supplied by a client cannot be split into a
    /// (service, operation) pair.
    #[error("Invalid tool name '{name}': expected the format '{expected}'")]
    InvalidToolName { name: String, expected: String },
}

impl NamingError {
    /// Create a naming conflict error.
    pub fn conflict(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NamingConflict {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid tool name error.
    pub fn invalid_tool_name(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidToolName {
            name: name.into(),
            expected: expected.into(),
        }
    }
}
