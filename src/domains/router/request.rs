//! Protocol methods understood by the router and their parameters.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::envelope::JsonRpcError;
use crate::domains::catalog::JsonObject;

/// Supported protocol methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ListTools,
    CallTool,
}

impl Method {
    /// Look up a method by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "initialize" => Some(Self::Initialize),
            "tools/list" => Some(Self::ListTools),
            "tools/call" => Some(Self::CallTool),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::ListTools => "tools/list",
            Self::CallTool => "tools/call",
        }
    }
}

/// Client identity sent with `initialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Parameters of `initialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Value,
    pub client_info: ClientInfo,
}

/// Parameters of `tools/call`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<JsonObject>,
}

/// A request whose parameters have been validated.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolRequest {
    Initialize(InitializeParams),
    ListTools,
    CallTool(CallToolParams),
}

impl ProtocolRequest {
    /// Validate `params` against the shape `method` expects.
    ///
    /// Unknown methods fail with `METHOD_NOT_FOUND`, parameter mismatches
    /// with `INVALID_PARAMS`.
    pub fn parse(method: &str, params: Option<Value>) -> Result<Self, JsonRpcError> {
        let method = Method::from_name(method).ok_or_else(|| JsonRpcError::method_not_found(method))?;

        match method {
            Method::Initialize => decode(params).map(Self::Initialize),
            // Pagination cursors are accepted but the whole list is always returned.
            Method::ListTools => Ok(Self::ListTools),
            Method::CallTool => decode(params).map(Self::CallTool),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::Initialize(_) => Method::Initialize,
            Self::ListTools => Method::ListTools,
            Self::CallTool(_) => Method::CallTool,
        }
    }
}

fn decode<T: DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    serde_json::from_value(params.unwrap_or(Value::Null))
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid request: {}", e)))
}
