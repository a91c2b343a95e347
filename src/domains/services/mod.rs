//! Built-in services.
//!
//! Served in-process when no remote executor endpoint is configured.
//!
//! ## Architecture
//!
//! - `greeter.rs` - `Greeter` (`hello`)
//! - `session.rs` - `SessionStore` (`append`, excluded `reset`)
//!
//! ## Adding a New Service
//!
//! 1. Create a new file with the input/output types and a `handler()` builder
//! 2. Export it here
//! 3. Register it in [`local_executor`]

mod greeter;
mod session;

pub use greeter::{Greeter, HelloInput, HelloOutput};
pub use session::{AppendInput, ResetInput, SessionData, SessionStore};

use std::sync::Arc;
use tracing::info;

use crate::domains::catalog::{Catalog, CatalogError, CatalogService};
use crate::domains::executor::LocalExecutor;
use crate::domains::naming::NamingScheme;

/// Build an executor serving the built-in services and their catalog.
///
/// Fails if any service cannot be registered under `scheme`.
pub fn local_executor(scheme: NamingScheme) -> Result<LocalExecutor, CatalogError> {
    let handlers = vec![Greeter::handler(), SessionStore::new().handler()];

    let mut catalog = Catalog::new(scheme);
    for handler in &handlers {
        catalog.register(handler)?;
    }

    let mut executor = LocalExecutor::new();
    for handler in handlers {
        executor.register(handler);
    }
    executor.register(CatalogService::handler(Arc::new(catalog)));

    info!("Serving built-in services: {:?}", executor.service_names());
    Ok(executor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::JsonObject;
    use crate::domains::gateway::{Gateway, GatewayError};
    use crate::domains::router::{JsonRpcError, MessageRouter, RequestId, ServerIdentity};
    use serde_json::{Value, json};
    use std::time::Duration;

    fn gateway(scheme: NamingScheme) -> Gateway {
        Gateway::new(Arc::new(local_executor(scheme).unwrap()), scheme)
    }

    fn arguments(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_local_executor_lists_built_in_tools() {
        let tools = gateway(NamingScheme::Flattened).list_tools().await.unwrap();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["greeter_hello", "sessionstore_append"]);
    }

    #[tokio::test]
    async fn test_session_append_through_gateway() {
        let gateway = gateway(NamingScheme::Flattened);

        let first = gateway
            .call_tool(
                "sessionstore_append",
                arguments(json!({"session_id": "s1", "value": 1})),
            )
            .await
            .unwrap();
        assert_eq!(first, json!({"data": [1]}));

        let second = gateway
            .call_tool(
                "sessionstore_append",
                arguments(json!({"session_id": "s1", "value": 2})),
            )
            .await
            .unwrap();
        assert_eq!(second, json!({"data": [1, 2]}));
    }

    #[tokio::test]
    async fn test_excluded_reset_is_callable() {
        let gateway = gateway(NamingScheme::default());
        gateway
            .call_tool(
                "SessionStore.append",
                arguments(json!({"session_id": "s", "value": 5})),
            )
            .await
            .unwrap();
        let reset = gateway
            .call_tool("SessionStore.reset", arguments(json!({"session_id": "s"})))
            .await
            .unwrap();
        assert_eq!(reset, json!({"data": [5]}));
    }

    #[tokio::test]
    async fn test_missing_separator_leaves_state_untouched() {
        let gateway = gateway(NamingScheme::Flattened);
        let err = gateway
            .call_tool("sessionstoreappend", JsonObject::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidToolName(_)));

        let tools = gateway.list_tools().await.unwrap();
        assert_eq!(tools.len(), 2);
    }

    #[tokio::test]
    async fn test_session_scenario_through_router() {
        let router = MessageRouter::new(
            Arc::new(gateway(NamingScheme::Flattened)),
            ServerIdentity::default(),
        );
        let mut connection = router.connect();

        let frames = [
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test", "version": "1.0"}
            }}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {
                "name": "sessionstore_append",
                "arguments": {"session_id": "x", "value": 1}
            }}),
            json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {
                "name": "sessionstore_append",
                "arguments": {"session_id": "x", "value": 2}
            }}),
            json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call", "params": {
                "name": "noseparator"
            }}),
            json!({"jsonrpc": "2.0", "id": 6, "method": "tools/call", "params": {
                "name": "greeter_hello",
                "arguments": {}
            }}),
        ];
        for frame in frames {
            assert!(connection.send(frame).await);
        }

        let mut responses = Vec::new();
        for _ in 0..6 {
            let response = tokio::time::timeout(Duration::from_secs(5), connection.recv())
                .await
                .unwrap()
                .unwrap();
            responses.push(response);
        }

        let ids: Vec<_> = responses.iter().map(|r| r.id.clone()).collect();
        assert_eq!(
            ids,
            (1..=6i64).map(|id| Some(RequestId::from(id))).collect::<Vec<_>>()
        );

        let tools = responses[1].result.as_ref().unwrap();
        assert_eq!(tools["tools"][1]["name"], "sessionstore_append");

        let first = responses[2].result.as_ref().unwrap();
        assert_eq!(first["structuredContent"], json!({"data": [1]}));
        let second = responses[3].result.as_ref().unwrap();
        assert_eq!(second["structuredContent"], json!({"data": [1, 2]}));

        let invalid = responses[4].error.as_ref().unwrap();
        assert_eq!(invalid.code, JsonRpcError::INVALID_PARAMS);

        let failed = responses[5].result.as_ref().unwrap();
        assert_eq!(failed["isError"], json!(true));

        connection.handle().cancel();
    }
}
