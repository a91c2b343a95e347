//! Call result shaping.

use rmcp::model::{CallToolResult, Content};
use serde_json::Value;

/// Wrap a raw operation result for an MCP client.
///
/// Object-shaped results become structured content with an empty content
/// list; anything else is rendered as a single text item.
pub fn into_call_tool_result(value: Value) -> CallToolResult {
    match value {
        Value::Object(_) => CallToolResult {
            content: vec![],
            structured_content: Some(value),
            is_error: Some(false),
            meta: None,
        },
        Value::String(text) => CallToolResult::success(vec![Content::text(text)]),
        other => CallToolResult::success(vec![Content::text(other.to_string())]),
    }
}

/// A tool-level error result carrying `message` as text.
pub fn error_result(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}
