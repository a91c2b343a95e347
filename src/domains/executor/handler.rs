//! Service handlers - a service descriptor bound to its operation handlers.

use futures::FutureExt;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::error::ExecutionError;
use super::request::OperationContext;
use crate::domains::catalog::{OperationDescriptor, ServiceDefinition, ServiceDescriptor};

/// Future returned by an operation handler.
pub type OperationFuture = BoxFuture<'static, Result<Value, ExecutionError>>;

/// A type-erased operation handler.
pub type OperationFn = Arc<dyn Fn(OperationContext, Value) -> OperationFuture + Send + Sync>;

/// A service and the handlers for its operations.
#[derive(Clone)]
pub struct ServiceHandler {
    descriptor: ServiceDescriptor,
    handlers: HashMap<String, OperationFn>,
}

impl ServiceHandler {
    /// Start declaring a service.
    pub fn builder(name: impl Into<String>) -> ServiceHandlerBuilder {
        ServiceHandlerBuilder {
            descriptor: ServiceDescriptor::new(name),
            handlers: HashMap::new(),
        }
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Run `operation` with the given input.
    pub async fn invoke(&self, ctx: OperationContext, input: Value) -> Result<Value, ExecutionError> {
        let handler = self
            .handlers
            .get(&ctx.operation)
            .ok_or_else(|| ExecutionError::operation_not_found(&ctx.service, &ctx.operation))?
            .clone();
        handler(ctx, input).await
    }
}

impl fmt::Debug for ServiceHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound: Vec<_> = self.handlers.keys().collect();
        bound.sort();
        f.debug_struct("ServiceHandler")
            .field("descriptor", &self.descriptor)
            .field("handlers", &bound)
            .finish()
    }
}

impl ServiceDefinition for ServiceHandler {
    fn descriptor(&self) -> Option<&ServiceDescriptor> {
        Some(&self.descriptor)
    }

    fn is_invocable(&self, operation: &OperationDescriptor) -> bool {
        self.handlers.contains_key(&operation.name)
    }
}

/// Builder for [`ServiceHandler`]. Operations keep their declaration order.
pub struct ServiceHandlerBuilder {
    descriptor: ServiceDescriptor,
    handlers: HashMap<String, OperationFn>,
}

impl ServiceHandlerBuilder {
    /// Add an operation backed by a raw JSON handler.
    pub fn operation<F, Fut>(mut self, descriptor: OperationDescriptor, handler: F) -> Self
    where
        F: Fn(OperationContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ExecutionError>> + Send + 'static,
    {
        let handler: OperationFn = Arc::new(move |ctx, input| handler(ctx, input).boxed());
        self.handlers.insert(descriptor.name.clone(), handler);
        self.descriptor.operations.push(descriptor);
        self
    }

    /// Add an operation with typed input and output.
    ///
    /// The input schema is derived from `I`. Input that does not decode into
    /// `I` fails with [`ExecutionError::InvalidInput`].
    pub fn typed_operation<I, O, F, Fut>(
        self,
        descriptor: OperationDescriptor,
        handler: F,
    ) -> Self
    where
        I: DeserializeOwned + JsonSchema + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(OperationContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ExecutionError>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let descriptor = descriptor.input_type::<I>();
        self.operation(descriptor, move |ctx, input| {
            let handler = handler.clone();
            async move {
                let input: I = serde_json::from_value(input)
                    .map_err(|e| ExecutionError::invalid_input(e.to_string()))?;
                let output = handler(ctx, input).await?;
                serde_json::to_value(output)
                    .map_err(|e| ExecutionError::MalformedResult(e.to_string()))
            }
        })
    }

    /// Declare an operation without binding a handler to it.
    pub fn declare(mut self, descriptor: OperationDescriptor) -> Self {
        self.descriptor.operations.push(descriptor);
        self
    }

    pub fn build(self) -> ServiceHandler {
        ServiceHandler {
            descriptor: self.descriptor,
            handlers: self.handlers,
        }
    }
}
