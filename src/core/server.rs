//! MCP server handler.
//!
//! `BridgeServer` implements rmcp's `ServerHandler` by delegating tool
//! listing and tool calls to the [`Gateway`]. It holds no tools of its own:
//! every tool comes from the executor side's catalog.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::config::Config;
use crate::domains::catalog::{JsonObject, ToolDescriptor};
use crate::domains::gateway::{Gateway, GatewayError, error_result, into_call_tool_result};
use crate::domains::router::{MessageRouter, ServerIdentity};

/// The bridge's MCP server handler.
#[derive(Clone)]
pub struct BridgeServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Gateway answering list and call requests.
    gateway: Arc<Gateway>,
}

impl BridgeServer {
    /// Create a new server with the given configuration and gateway.
    pub fn new(config: Config, gateway: Gateway) -> Self {
        Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    pub fn identity(&self) -> ServerIdentity {
        self.config.identity()
    }

    /// A message router over this server's gateway, for transports that
    /// drive raw JSON-RPC frames themselves.
    pub fn router(&self) -> MessageRouter<Gateway> {
        MessageRouter::new(self.gateway.clone(), self.identity())
            .with_capacity(self.config.bridge.router_capacity)
    }

    /// List tools as rmcp models.
    pub async fn tools(&self) -> Result<Vec<Tool>, McpError> {
        let tools = self
            .gateway
            .list_tools()
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(tools.into_iter().map(to_mcp_tool).collect())
    }

    /// Call a tool, mapping gateway failures the MCP way.
    ///
    /// A malformed tool name is a protocol error; anything the executor
    /// reports becomes a tool result with `isError` set.
    pub async fn call(&self, name: &str, arguments: JsonObject) -> Result<CallToolResult, McpError> {
        match self.gateway.call_tool(name, arguments).await {
            Ok(value) => Ok(into_call_tool_result(value)),
            Err(e @ GatewayError::InvalidToolName(_)) => {
                Err(McpError::invalid_params(e.to_string(), None))
            }
            Err(e) => {
                warn!("Tool '{}' failed: {}", name, e);
                Ok(error_result(e.to_string()))
            }
        }
    }
}

/// Convert a catalog tool descriptor into rmcp's `Tool`.
fn to_mcp_tool(descriptor: ToolDescriptor) -> Tool {
    let mut tool = Tool::new(
        descriptor.name,
        descriptor.description.clone().unwrap_or_default(),
        Arc::new(descriptor.input_schema),
    );
    tool.description = descriptor.description.map(Into::into);
    tool
}

impl ServerHandler for BridgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Bridges MCP tool calls to service operations. Tool names combine a service \
                 and an operation."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.tools().await?,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);
        self.call(&request.name, request.arguments.unwrap_or_default())
            .await
    }
}
