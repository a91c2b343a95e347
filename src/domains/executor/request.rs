//! The operation executor seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::ExecutionError;

/// A request to run one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRequest {
    pub service: String,
    pub operation: String,
    pub input: Value,
    /// Correlation id, unique per request.
    pub request_id: Uuid,
}

impl OperationRequest {
    /// Create a request with a fresh correlation id.
    pub fn new(service: impl Into<String>, operation: impl Into<String>, input: Value) -> Self {
        Self {
            service: service.into(),
            operation: operation.into(),
            input,
            request_id: Uuid::new_v4(),
        }
    }

    /// The context handed to the operation handler.
    pub fn context(&self) -> OperationContext {
        OperationContext {
            service: self.service.clone(),
            operation: self.operation.clone(),
            request_id: self.request_id,
        }
    }
}

/// What a handler knows about the request it is serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    pub service: String,
    pub operation: String,
    pub request_id: Uuid,
}

/// Runs named operations and returns their raw JSON result.
///
/// Implementations must be safe to call concurrently; the bridge holds no
/// lock while a call is in flight.
#[async_trait]
pub trait OperationExecutor: Send + Sync {
    async fn execute(&self, request: OperationRequest) -> Result<Value, ExecutionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        let a = OperationRequest::new("svc", "op", Value::Null);
        let b = OperationRequest::new("svc", "op", Value::Null);
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_context_carries_request_id() {
        let request = OperationRequest::new("svc", "op", Value::Null);
        let ctx = request.context();
        assert_eq!(ctx.service, "svc");
        assert_eq!(ctx.operation, "op");
        assert_eq!(ctx.request_id, request.request_id);
    }
}
