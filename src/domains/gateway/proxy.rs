//! Gateway - forwards tool listing and tool calls to an operation executor.

use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};

use super::error::GatewayError;
use crate::domains::catalog::{CATALOG_SERVICE, JsonObject, LIST_TOOLS_OPERATION, ToolDescriptor};
use crate::domains::executor::{OperationExecutor, OperationRequest};
use crate::domains::naming::{NamingScheme, ToolAddress, ToolNameCodec, strip_client_prefix};

/// Unknown names remembered before the set is reset.
const MAX_REMEMBERED_MISSES: usize = 1024;

/// Proxy between an MCP server and an operation executor.
pub struct Gateway {
    executor: Arc<dyn OperationExecutor>,
    codec: ToolNameCodec,
    /// Flattened names that already triggered a refresh.
    misses: Mutex<HashSet<String>>,
}

impl Gateway {
    /// Create a gateway decoding tool names with `scheme`.
    pub fn new(executor: Arc<dyn OperationExecutor>, scheme: NamingScheme) -> Self {
        Self {
            executor,
            codec: ToolNameCodec::new(scheme),
            misses: Mutex::new(HashSet::new()),
        }
    }

    /// The codec used to decode tool names.
    pub fn codec(&self) -> &ToolNameCodec {
        &self.codec
    }

    /// Fetch the tool list from the handler-side catalog.
    ///
    /// Every listed address is recorded in the codec's side table so that
    /// flattened names resolve to their original service casing.
    #[instrument(skip(self))]
    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, GatewayError> {
        let request = OperationRequest::new(CATALOG_SERVICE, LIST_TOOLS_OPERATION, Value::Null);
        let value = self.executor.execute(request).await?;

        let tools: Vec<ToolDescriptor> = serde_json::from_value(value)
            .map_err(|e| GatewayError::MalformedCatalog(e.to_string()))?;

        for tool in &tools {
            if let Some(address) = &tool.address {
                self.codec.remember(&tool.name, address.clone());
            }
        }

        info!("Listed {} tool(s)", tools.len());
        Ok(tools)
    }

    /// Call the operation behind `name` with `arguments`.
    ///
    /// The executor's result is returned verbatim.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(&self, name: &str, arguments: JsonObject) -> Result<Value, GatewayError> {
        let address = self.resolve(name).await?;
        debug!(
            "Calling {}/{} for tool '{}'",
            address.service, address.operation, name
        );

        let request = OperationRequest::new(
            address.service,
            address.operation,
            Value::Object(arguments),
        );
        Ok(self.executor.execute(request).await?)
    }

    /// Decode a client-supplied tool name.
    ///
    /// A flattened name missing from the side table triggers one refresh of
    /// the tool list before falling back to the raw split. Each unknown name
    /// triggers at most one refresh.
    pub async fn resolve(&self, name: &str) -> Result<ToolAddress, GatewayError> {
        self.codec.split(name)?;

        if self.codec.scheme() == NamingScheme::Flattened {
            let stripped = strip_client_prefix(name);
            if !self.codec.is_known(stripped) && self.first_miss(stripped) {
                debug!("Tool '{}' unknown, refreshing tool list", stripped);
                if let Err(e) = self.list_tools().await {
                    warn!("Failed to refresh tool list: {}", e);
                }
            }
        }

        Ok(self.codec.decode(name)?)
    }

    /// Record `name` as unknown; `false` if it was already recorded.
    fn first_miss(&self, name: &str) -> bool {
        let mut misses = self.misses.lock().unwrap_or_else(PoisonError::into_inner);
        if misses.len() >= MAX_REMEMBERED_MISSES {
            misses.clear();
        }
        misses.insert(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::{Catalog, CatalogService, OperationDescriptor};
    use crate::domains::executor::{ExecutionError, LocalExecutor, ServiceHandler};
    use crate::domains::naming::NamingError;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Deserialize, schemars::JsonSchema)]
    struct MyInput {
        name: String,
    }

    #[derive(Serialize)]
    struct MyOutput {
        message: String,
    }

    fn test_service() -> ServiceHandler {
        ServiceHandler::builder("modified-service-name")
            .typed_operation(
                OperationDescriptor::new("modified-op-name").description("This is a test operation."),
                |_ctx, input: MyInput| async move {
                    Ok::<_, ExecutionError>(MyOutput {
                        message: format!("Hello, {}", input.name),
                    })
                },
            )
            .typed_operation(
                OperationDescriptor::new("op2").description("This is also a test operation."),
                |_ctx, input: MyInput| async move {
                    Ok::<_, ExecutionError>(MyOutput {
                        message: format!("Hello, {}", input.name),
                    })
                },
            )
            .typed_operation(
                OperationDescriptor::new("op3")
                    .description("This is also a test operation.")
                    .excluded(),
                |_ctx, input: MyInput| async move {
                    Ok::<_, ExecutionError>(MyOutput {
                        message: format!("Hello, {}", input.name),
                    })
                },
            )
            .build()
    }

    fn gateway(scheme: NamingScheme, service: ServiceHandler) -> Gateway {
        let mut catalog = Catalog::new(scheme);
        catalog.register(&service).unwrap();
        let executor = LocalExecutor::new()
            .with_service(service)
            .with_service(CatalogService::handler(Arc::new(catalog)));
        Gateway::new(Arc::new(executor), scheme)
    }

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    /// Records every request and answers with a fixed value.
    struct RecordingExecutor {
        requests: Mutex<Vec<OperationRequest>>,
        response: Value,
    }

    #[async_trait]
    impl OperationExecutor for RecordingExecutor {
        async fn execute(&self, request: OperationRequest) -> Result<Value, ExecutionError> {
            self.requests.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    #[tokio::test]
    async fn test_list_tools_lossless() {
        let gateway = gateway(NamingScheme::default(), test_service());
        let tools = gateway.list_tools().await.unwrap();

        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "modified-service-name.modified-op-name",
                "modified-service-name.op2"
            ]
        );
        assert!(tools[0].input_schema.contains_key("properties"));
    }

    #[tokio::test]
    async fn test_call_tool_lossless() {
        let gateway = gateway(NamingScheme::default(), test_service());
        let result = gateway
            .call_tool(
                "modified-service-name.modified-op-name",
                args(json!({"name": "World"})),
            )
            .await
            .unwrap();
        assert_eq!(result, json!({"message": "Hello, World"}));
    }

    #[tokio::test]
    async fn test_call_tool_flattened_without_prior_listing() {
        let gateway = gateway(NamingScheme::Flattened, test_service());
        let result = gateway
            .call_tool("modified-service-name_op2", args(json!({"name": "World"})))
            .await
            .unwrap();
        assert_eq!(result, json!({"message": "Hello, World"}));
        assert!(gateway.codec().is_known("modified-service-name_op2"));
    }

    #[tokio::test]
    async fn test_call_tool_strips_client_prefix() {
        let gateway = gateway(NamingScheme::Flattened, test_service());
        let result = gateway
            .call_tool(
                "mcp__bridge__modified-service-name_modified-op-name",
                args(json!({"name": "World"})),
            )
            .await
            .unwrap();
        assert_eq!(result, json!({"message": "Hello, World"}));
    }

    #[tokio::test]
    async fn test_flattened_restores_service_casing() {
        let service = ServiceHandler::builder("TestService")
            .operation(OperationDescriptor::new("append"), |ctx, _input| async move {
                Ok::<_, ExecutionError>(json!({"service": ctx.service}))
            })
            .build();
        let gateway = gateway(NamingScheme::Flattened, service);

        let tools = gateway.list_tools().await.unwrap();
        assert_eq!(tools[0].name, "testservice_append");

        let result = gateway
            .call_tool("testservice_append", JsonObject::new())
            .await
            .unwrap();
        assert_eq!(result, json!({"service": "TestService"}));
    }

    #[tokio::test]
    async fn test_excluded_operation_still_callable() {
        let gateway = gateway(NamingScheme::default(), test_service());
        let result = gateway
            .call_tool("modified-service-name.op3", args(json!({"name": "X"})))
            .await
            .unwrap();
        assert_eq!(result, json!({"message": "Hello, X"}));
    }

    #[tokio::test]
    async fn test_invalid_tool_name() {
        let gateway = gateway(NamingScheme::Flattened, test_service());
        for name in ["noseparator", "_op", "svc_", "client__"] {
            let err = gateway.call_tool(name, JsonObject::new()).await.unwrap_err();
            assert!(
                matches!(
                    err,
                    GatewayError::InvalidToolName(NamingError::InvalidToolName { .. })
                ),
                "{} should be rejected, got {:?}",
                name,
                err
            );
            assert!(err.is_client_error());
        }
    }

    #[tokio::test]
    async fn test_remote_errors_pass_through() {
        let gateway = gateway(NamingScheme::default(), test_service());
        let err = gateway
            .call_tool("modified-service-name.modified-op-name", args(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Execution(ExecutionError::InvalidInput(_))
        ));

        let err = gateway
            .call_tool("Unknown.op", JsonObject::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Execution(ExecutionError::ServiceNotFound("Unknown".to_string()))
        );
    }

    #[tokio::test]
    async fn test_each_call_uses_fresh_request_id() {
        let executor = Arc::new(RecordingExecutor {
            requests: Mutex::new(Vec::new()),
            response: json!([]),
        });
        let gateway = Gateway::new(executor.clone(), NamingScheme::default());

        gateway.list_tools().await.unwrap();
        gateway.list_tools().await.unwrap();

        let requests = executor.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].service, CATALOG_SERVICE);
        assert_eq!(requests[0].operation, LIST_TOOLS_OPERATION);
        assert_eq!(requests[0].input, Value::Null);
        assert_ne!(requests[0].request_id, requests[1].request_id);
    }

    #[tokio::test]
    async fn test_unknown_flattened_name_refreshes_once() {
        let executor = Arc::new(RecordingExecutor {
            requests: Mutex::new(Vec::new()),
            response: json!([]),
        });
        let gateway = Gateway::new(executor.clone(), NamingScheme::Flattened);

        for _ in 0..3 {
            gateway.call_tool("ghost_op", JsonObject::new()).await.unwrap();
        }
        gateway.call_tool("other_op", JsonObject::new()).await.unwrap();

        let requests = executor.requests.lock().unwrap();
        let refreshes = requests
            .iter()
            .filter(|r| r.operation == LIST_TOOLS_OPERATION)
            .count();
        assert_eq!(refreshes, 2);
        assert_eq!(requests.len(), 6);
        assert_eq!(requests[1].service, "ghost");
        assert_eq!(requests[2].service, "ghost");
    }

    #[tokio::test]
    async fn test_malformed_catalog() {
        let executor = Arc::new(RecordingExecutor {
            requests: Mutex::new(Vec::new()),
            response: json!({"not": "a list"}),
        });
        let gateway = Gateway::new(executor, NamingScheme::default());
        let err = gateway.list_tools().await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedCatalog(_)));
    }
}
