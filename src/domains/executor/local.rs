//! In-process operation executor.
//!
//! Serves registered [`ServiceHandler`]s directly. This is the handler side
//! of the bridge when no remote endpoint is configured.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::error::ExecutionError;
use super::handler::ServiceHandler;
use super::request::{OperationExecutor, OperationRequest};

/// Executes operations against in-process service handlers.
#[derive(Debug, Clone, Default)]
pub struct LocalExecutor {
    services: HashMap<String, Arc<ServiceHandler>>,
}

impl LocalExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service handler, replacing any handler with the same name.
    pub fn with_service(mut self, handler: ServiceHandler) -> Self {
        self.register(handler);
        self
    }

    /// Add a service handler, replacing any handler with the same name.
    pub fn register(&mut self, handler: ServiceHandler) {
        debug!("Local executor serving '{}'", handler.name());
        self.services
            .insert(handler.name().to_string(), Arc::new(handler));
    }

    /// Names of all served services, sorted.
    pub fn service_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[async_trait]
impl OperationExecutor for LocalExecutor {
    #[instrument(skip_all, fields(service = %request.service, operation = %request.operation, request_id = %request.request_id))]
    async fn execute(&self, request: OperationRequest) -> Result<Value, ExecutionError> {
        let service = self
            .services
            .get(&request.service)
            .ok_or_else(|| ExecutionError::ServiceNotFound(request.service.clone()))?
            .clone();

        let ctx = request.context();
        service.invoke(ctx, request.input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::OperationDescriptor;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn executor() -> LocalExecutor {
        LocalExecutor::new().with_service(
            ServiceHandler::builder("Echo")
                .operation(OperationDescriptor::new("echo"), |ctx, input| async move {
                    Ok::<_, ExecutionError>(json!({
                        "operation": ctx.operation,
                        "input": input,
                    }))
                })
                .build(),
        )
    }

    #[tokio::test]
    async fn test_execute_routes_to_handler() {
        let result = assert_ok!(
            executor()
                .execute(OperationRequest::new("Echo", "echo", json!({"a": 1})))
                .await
        );
        assert_eq!(result, json!({"operation": "echo", "input": {"a": 1}}));
    }

    #[tokio::test]
    async fn test_execute_unknown_service() {
        let err = assert_err!(
            executor()
                .execute(OperationRequest::new("Missing", "echo", Value::Null))
                .await
        );
        assert_eq!(err, ExecutionError::ServiceNotFound("Missing".to_string()));
    }

    #[tokio::test]
    async fn test_execute_unknown_operation() {
        let err = assert_err!(
            executor()
                .execute(OperationRequest::new("Echo", "shout", Value::Null))
                .await
        );
        assert!(matches!(err, ExecutionError::OperationNotFound { .. }));
    }

    #[test]
    fn test_service_names() {
        let executor = executor().with_service(ServiceHandler::builder("Alpha").build());
        assert_eq!(executor.service_names(), vec!["Alpha", "Echo"]);
    }
}
