//! Greeter service definition.
//!
//! A minimal stateless service with one operation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domains::catalog::OperationDescriptor;
use crate::domains::executor::{ExecutionError, OperationContext, ServiceHandler};

// ============================================================================
// Operation Input / Output
// ============================================================================

/// Input of `hello`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct HelloInput {
    /// Name of the person to greet.
    pub name: String,
}

/// Output of `hello`.
#[derive(Debug, Clone, Serialize)]
pub struct HelloOutput {
    pub message: String,
}

// ============================================================================
// Service Definition
// ============================================================================

/// Greeter service - says hello.
pub struct Greeter;

impl Greeter {
    /// Service name as registered in the catalog.
    pub const NAME: &'static str = "Greeter";

    /// Operation greeting a person by name.
    pub const HELLO: &'static str = "hello";

    /// Build the service handler.
    pub fn handler() -> ServiceHandler {
        ServiceHandler::builder(Self::NAME)
            .typed_operation(
                OperationDescriptor::new(Self::HELLO).description("Greet a person by name."),
                Self::hello,
            )
            .build()
    }

    async fn hello(ctx: OperationContext, input: HelloInput) -> Result<HelloOutput, ExecutionError> {
        info!("hello called for '{}' ({})", input.name, ctx.request_id);
        Ok(HelloOutput {
            message: format!("Hello, {}", input.name),
        })
    }
}
