//! Catalog domain module.
//!
//! Owns the registry of services exposed as MCP tools and produces the flat,
//! ordered tool list clients discover.
//!
//! ## Architecture
//!
//! - `descriptor.rs` - Service, operation and tool descriptors
//! - `registry.rs` - The `Catalog` itself (register / list)
//! - `service.rs` - The reserved `MCP` service exposing `ListTools` remotely
//! - `error.rs` - Catalog error types
//!
//! ## Registering a Service
//!
//! 1. Build a `ServiceHandler` (see `domains::executor`) with its operations
//! 2. Mark operations that must stay hidden with `OperationDescriptor::excluded()`
//! 3. Call `Catalog::register()` during startup, before serving traffic

mod descriptor;
mod error;
mod registry;
mod service;

pub use descriptor::{
    JsonObject, OperationDescriptor, ServiceDefinition, ServiceDescriptor, ServiceRegistration,
    ToolDescriptor,
};
pub use error::CatalogError;
pub use registry::Catalog;
pub use service::{CATALOG_SERVICE, CatalogService, LIST_TOOLS_OPERATION};
