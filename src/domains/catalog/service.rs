//! The catalog exposed as a service.
//!
//! A gateway that only holds an executor discovers tools by running the
//! reserved `MCP/ListTools` operation on the handler side.

use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::descriptor::OperationDescriptor;
use super::registry::Catalog;
use crate::domains::executor::{ExecutionError, ServiceHandler};

/// Reserved service name under which the catalog is served.
pub const CATALOG_SERVICE: &str = "MCP";

/// Operation returning the catalog's tool list.
pub const LIST_TOOLS_OPERATION: &str = "ListTools";

/// Factory for the `MCP` service handler.
pub struct CatalogService;

impl CatalogService {
    /// Build the `MCP` service handler serving `catalog`.
    ///
    /// The returned handler is meant for an executor, never for registration
    /// in a catalog.
    pub fn handler(catalog: Arc<Catalog>) -> ServiceHandler {
        ServiceHandler::builder(CATALOG_SERVICE)
            .operation(
                OperationDescriptor::new(LIST_TOOLS_OPERATION)
                    .description("List the operations exposed as MCP tools."),
                move |_ctx, _input: Value| {
                    let catalog = catalog.clone();
                    async move {
                        let tools = catalog.list_tools();
                        info!("Serving {} tool(s) from catalog", tools.len());
                        serde_json::to_value(tools)
                            .map_err(|e| ExecutionError::MalformedResult(e.to_string()))
                    }
                },
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::ToolDescriptor;
    use crate::domains::executor::{LocalExecutor, OperationExecutor, OperationRequest};
    use crate::domains::naming::NamingScheme;

    #[tokio::test]
    async fn test_list_tools_operation() {
        let mut catalog = Catalog::new(NamingScheme::default());
        catalog
            .register(
                &ServiceHandler::builder("Echo")
                    .operation(OperationDescriptor::new("echo"), |_ctx, input| async move {
                        Ok::<_, ExecutionError>(input)
                    })
                    .build(),
            )
            .unwrap();

        let executor = LocalExecutor::new().with_service(CatalogService::handler(Arc::new(catalog)));
        let value = executor
            .execute(OperationRequest::new(
                CATALOG_SERVICE,
                LIST_TOOLS_OPERATION,
                Value::Null,
            ))
            .await
            .unwrap();

        let tools: Vec<ToolDescriptor> = serde_json::from_value(value).unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "Echo.echo");
    }

    #[test]
    fn test_catalog_handler_cannot_be_registered() {
        let handler = CatalogService::handler(Arc::new(Catalog::default()));
        let mut catalog = Catalog::default();
        assert!(catalog.register(&handler).is_err());
    }
}
