//! JSON-RPC envelopes exchanged by the router.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// JSON-RPC protocol version carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier, echoed back on the matching response.
///
/// Numeric ids keep their JSON representation, so `1.5` or `u64::MAX`
/// come back exactly as the client sent them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<Number> for RequestId {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(Self::INVALID_REQUEST, msg)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(Self::METHOD_NOT_FOUND, format!("Unknown method: {}", method))
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(Self::INVALID_PARAMS, msg)
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::new(Self::INTERNAL_ERROR, msg)
    }
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<RequestId>, code: i32, message: impl Into<String>) -> Self {
        Self::failure(id, JsonRpcError::new(code, message))
    }

    /// Create an error response from a prepared error object.
    pub fn failure(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<RequestId>, msg: impl Into<String>) -> Self {
        Self::failure(id, JsonRpcError::invalid_request(msg))
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<RequestId>, method: &str) -> Self {
        Self::failure(id, JsonRpcError::method_not_found(method))
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<RequestId>, msg: impl Into<String>) -> Self {
        Self::failure(id, JsonRpcError::invalid_params(msg))
    }

    /// Internal error.
    pub fn internal_error(id: Option<RequestId>, msg: impl Into<String>) -> Self {
        Self::failure(id, JsonRpcError::internal_error(msg))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Classification of a raw inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// A well-formed request expecting exactly one response.
    Request(JsonRpcRequest),
    /// A notification; never answered.
    Notification { method: String },
    /// Anything else (responses, malformed frames); never answered.
    Ignored(String),
}

impl InboundMessage {
    /// Classify a decoded JSON frame.
    pub fn parse(frame: Value) -> Self {
        let Value::Object(mut object) = frame else {
            return Self::Ignored("frame is not a JSON object".to_string());
        };

        if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Self::Ignored("missing or unsupported jsonrpc version".to_string());
        }

        let method = match object.remove("method") {
            Some(Value::String(method)) => method,
            Some(_) => return Self::Ignored("method is not a string".to_string()),
            None => return Self::Ignored("frame has no method".to_string()),
        };

        let Some(id) = object.remove("id") else {
            return Self::Notification { method };
        };

        match serde_json::from_value::<RequestId>(id) {
            Ok(id) => Self::Request(JsonRpcRequest {
                jsonrpc: JSONRPC_VERSION.to_string(),
                id,
                method,
                params: object.remove("params"),
            }),
            Err(_) => Self::Ignored(format!("request '{}' has an invalid id", method)),
        }
    }
}
