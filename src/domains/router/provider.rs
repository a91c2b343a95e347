//! The seam between the router and whatever answers tool requests.

use async_trait::async_trait;
use serde_json::Value;

use crate::domains::catalog::{JsonObject, ToolDescriptor};
use crate::domains::gateway::{Gateway, GatewayError};

/// Source of tools for the router.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// List every exposed tool.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, GatewayError>;

    /// Call the tool `name` and return its raw result.
    async fn call_tool(&self, name: &str, arguments: JsonObject) -> Result<Value, GatewayError>;
}

#[async_trait]
impl ToolProvider for Gateway {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, GatewayError> {
        Gateway::list_tools(self).await
    }

    async fn call_tool(&self, name: &str, arguments: JsonObject) -> Result<Value, GatewayError> {
        Gateway::call_tool(self, name, arguments).await
    }
}
