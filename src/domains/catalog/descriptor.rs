//! Descriptor types for services, operations and tools.
//!
//! Descriptors are plain data: they are built once while a service is being
//! declared and never mutated afterwards.

use rmcp::handler::server::tool::schema_for_type;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::naming::ToolAddress;

/// A JSON object (`serde_json::Map`), used for schemas and tool arguments.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Operation Descriptor
// ============================================================================

/// Metadata for a single named operation of a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Operation name as addressed by the executor.
    pub name: String,

    /// Human-readable description shown to clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON schema of the operation input. Empty when the operation declares
    /// no typed input.
    #[serde(default, rename = "inputSchema")]
    pub input_schema: JsonObject,

    /// Whether the operation is hidden from the tool list. Excluded
    /// operations remain callable through the executor.
    #[serde(default)]
    pub excluded: bool,
}

impl OperationDescriptor {
    /// Create a descriptor with no description and an empty input schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: JsonObject::new(),
            excluded: false,
        }
    }

    /// Set the description. Surrounding whitespace is trimmed.
    pub fn description(mut self, description: impl AsRef<str>) -> Self {
        self.description = Some(description.as_ref().trim().to_string());
        self
    }

    /// Set an explicit input schema.
    pub fn input_schema(mut self, schema: JsonObject) -> Self {
        self.input_schema = schema;
        self
    }

    /// Derive the input schema from a Rust type.
    pub fn input_type<T: JsonSchema + 'static>(mut self) -> Self {
        self.input_schema = schema_for_type::<T>();
        self
    }

    /// Hide this operation from the tool list.
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }
}

// ============================================================================
// Service Descriptor
// ============================================================================

/// A named group of operations, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub operations: Vec<OperationDescriptor>,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
        }
    }

    /// Append an operation.
    pub fn with_operation(mut self, operation: OperationDescriptor) -> Self {
        self.operations.push(operation);
        self
    }

    /// Find an operation by name.
    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.iter().find(|op| op.name == name)
    }
}

/// Anything that can be registered in the catalog.
pub trait ServiceDefinition {
    /// The service metadata, or `None` if this value carries none.
    fn descriptor(&self) -> Option<&ServiceDescriptor>;

    /// Whether `operation` has a handler that can actually be invoked.
    fn is_invocable(&self, operation: &OperationDescriptor) -> bool;
}

// ============================================================================
// Tool Descriptor
// ============================================================================

/// A tool as listed to MCP clients.
///
/// Serializes as `{ name, description, inputSchema }`. The originating
/// address travels in `_meta` so a remote gateway can resolve flattened
/// names without guessing the service casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,

    pub description: Option<String>,

    #[serde(rename = "inputSchema", default)]
    pub input_schema: JsonObject,

    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<ToolAddress>,
}

impl ToolDescriptor {
    /// Build the tool descriptor for `operation` under the given tool name.
    pub fn from_operation(
        name: impl Into<String>,
        service: &str,
        operation: &OperationDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            description: operation.description.clone(),
            input_schema: operation.input_schema.clone(),
            address: Some(ToolAddress::new(service, &operation.name)),
        }
    }
}

// ============================================================================
// Service Registration
// ============================================================================

/// A registered service together with the tools derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRegistration {
    descriptor: ServiceDescriptor,
    tools: Vec<ToolDescriptor>,
}

impl ServiceRegistration {
    pub(super) fn new(descriptor: ServiceDescriptor, tools: Vec<ToolDescriptor>) -> Self {
        Self { descriptor, tools }
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Tools in operation declaration order; excluded operations are absent.
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }
}
