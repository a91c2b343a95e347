//! Single-envelope dispatch.
//!
//! Turns one validated JSON-RPC request into exactly one response. Used by
//! the router loop and directly by request/response transports.

use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use super::envelope::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use super::provider::ToolProvider;
use super::request::{CallToolParams, InitializeParams, ProtocolRequest};
use crate::domains::gateway::{error_result, into_call_tool_result};

/// MCP protocol revision announced in `initialize` responses.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name and version reported to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub name: String,
    pub version: String,
}

impl ServerIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// Answer one request.
///
/// Request-level failures become error responses; this never fails.
#[instrument(skip_all, fields(id = %request.id, method = %request.method))]
pub async fn dispatch<P>(
    provider: &P,
    identity: &ServerIdentity,
    request: JsonRpcRequest,
) -> JsonRpcResponse
where
    P: ToolProvider + ?Sized,
{
    let id = Some(request.id);

    let outcome = match ProtocolRequest::parse(&request.method, request.params) {
        Ok(parsed) => handle(provider, identity, parsed).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(error) => {
            warn!("Request failed ({}): {}", error.code, error.message);
            JsonRpcResponse::failure(id, error)
        }
    }
}

async fn handle<P>(
    provider: &P,
    identity: &ServerIdentity,
    request: ProtocolRequest,
) -> Result<Value, JsonRpcError>
where
    P: ToolProvider + ?Sized,
{
    match request {
        ProtocolRequest::Initialize(params) => Ok(initialize(identity, &params)),
        ProtocolRequest::ListTools => {
            let tools = provider
                .list_tools()
                .await
                .map_err(|e| JsonRpcError::internal_error(e.to_string()))?;
            Ok(json!({ "tools": tools }))
        }
        ProtocolRequest::CallTool(params) => call_tool(provider, params).await,
    }
}

fn initialize(identity: &ServerIdentity, params: &InitializeParams) -> Value {
    debug!(
        "Initializing for client {} {} (protocol {})",
        params.client_info.name, params.client_info.version, params.protocol_version
    );

    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": identity.name,
            "version": identity.version,
        }
    })
}

async fn call_tool<P>(provider: &P, params: CallToolParams) -> Result<Value, JsonRpcError>
where
    P: ToolProvider + ?Sized,
{
    let arguments = params.arguments.unwrap_or_default();

    let result = match provider.call_tool(&params.name, arguments).await {
        Ok(value) => into_call_tool_result(value),
        Err(e) if e.is_client_error() => return Err(JsonRpcError::invalid_params(e.to_string())),
        Err(e) => {
            warn!("Tool '{}' failed: {}", params.name, e);
            error_result(e.to_string())
        }
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::{JsonObject, ToolDescriptor};
    use crate::domains::executor::ExecutionError;
    use crate::domains::gateway::GatewayError;
    use crate::domains::naming::NamingError;
    use crate::domains::router::envelope::RequestId;
    use async_trait::async_trait;

    /// Echoes arguments back, fails on a few reserved names.
    struct EchoProvider;

    #[async_trait]
    impl ToolProvider for EchoProvider {
        async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, GatewayError> {
            Ok(vec![ToolDescriptor {
                name: "echo.echo".to_string(),
                description: Some("Echo".to_string()),
                input_schema: JsonObject::new(),
                address: None,
            }])
        }

        async fn call_tool(
            &self,
            name: &str,
            arguments: JsonObject,
        ) -> Result<Value, GatewayError> {
            match name {
                "echo.echo" => Ok(Value::Object(arguments)),
                "echo.text" => Ok(json!("plain text")),
                "echo.number" => Ok(json!(42)),
                "echo.fail" => Err(ExecutionError::failed("boom").into()),
                _ => Err(NamingError::invalid_tool_name(name, "<service>.<operation>").into()),
            }
        }
    }

    async fn call(method: &str, params: Option<Value>) -> JsonRpcResponse {
        dispatch(
            &EchoProvider,
            &ServerIdentity::new("bridge", "0.1.0"),
            JsonRpcRequest::new(1i64, method, params),
        )
        .await
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = call(
            "initialize",
            Some(json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test", "version": "1.0"}
            })),
        )
        .await;

        assert_eq!(response.id, Some(RequestId::from(1i64)));
        assert_eq!(
            response.result,
            Some(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "bridge", "version": "0.1.0"}
            }))
        );
    }

    #[tokio::test]
    async fn test_list_tools() {
        let response = call("tools/list", None).await;
        let result = response.result.unwrap();
        assert_eq!(result["tools"][0]["name"], "echo.echo");
        assert_eq!(result["tools"][0]["inputSchema"], json!({}));
    }

    #[tokio::test]
    async fn test_call_tool_structured() {
        let response = call(
            "tools/call",
            Some(json!({"name": "echo.echo", "arguments": {"data": [1]}})),
        )
        .await;
        let result = response.result.unwrap();
        assert_eq!(result["structuredContent"], json!({"data": [1]}));
        assert_eq!(result["content"], json!([]));
        assert_eq!(result["isError"], json!(false));
    }

    #[tokio::test]
    async fn test_call_tool_text() {
        let response = call("tools/call", Some(json!({"name": "echo.text"}))).await;
        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["text"], "plain text");

        let response = call("tools/call", Some(json!({"name": "echo.number"}))).await;
        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["text"], "42");
    }

    #[tokio::test]
    async fn test_call_tool_remote_failure_is_tool_error() {
        let response = call("tools/call", Some(json!({"name": "echo.fail"}))).await;
        assert!(!response.is_error());
        let result = response.result.unwrap();
        assert_eq!(result["isError"], json!(true));
        assert!(result["content"][0]["text"].as_str().unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn test_call_tool_invalid_name() {
        let response = call("tools/call", Some(json!({"name": "nosep"}))).await;
        let error = response.error.unwrap();
        assert_eq!(error.code, JsonRpcError::INVALID_PARAMS);
        assert!(error.message.contains("nosep"));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = call("resources/list", None).await;
        assert_eq!(response.error.unwrap().code, JsonRpcError::METHOD_NOT_FOUND);
        assert_eq!(response.id, Some(RequestId::from(1i64)));
    }
}
