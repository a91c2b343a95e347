//! Tool catalog - central registration of services exposed as tools.
//!
//! Services are registered during startup. Registration either succeeds as a
//! whole or leaves the catalog untouched. Once traffic starts the catalog is
//! only read, so listing needs no locking.

use std::collections::HashSet;
use tracing::{debug, info};

use super::descriptor::{ServiceDefinition, ServiceRegistration, ToolDescriptor};
use super::error::CatalogError;
use super::service::CATALOG_SERVICE;
use crate::domains::naming::{NamingError, NamingScheme, ToolAddress, ToolNameCodec};

/// Registry of services, in registration order.
#[derive(Debug, Default)]
pub struct Catalog {
    codec: ToolNameCodec,
    registrations: Vec<ServiceRegistration>,
}

impl Catalog {
    /// Create an empty catalog using the given naming scheme.
    pub fn new(scheme: NamingScheme) -> Self {
        Self {
            codec: ToolNameCodec::new(scheme),
            registrations: Vec::new(),
        }
    }

    /// The codec used to compose tool names.
    pub fn codec(&self) -> &ToolNameCodec {
        &self.codec
    }

    /// All registrations, in registration order.
    pub fn registrations(&self) -> &[ServiceRegistration] {
        &self.registrations
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether no service has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Register a service and derive its tools.
    ///
    /// Fails with `NotAService` when the target has no service metadata or an
    /// operation has no invocable handler, and with `NamingConflict` when the
    /// service name or any composed tool name violates the naming policy or
    /// is already taken.
    pub fn register<S>(&mut self, service: &S) -> Result<&ServiceRegistration, CatalogError>
    where
        S: ServiceDefinition + ?Sized,
    {
        let descriptor = service
            .descriptor()
            .ok_or_else(|| CatalogError::not_a_service("<unknown>", "no service definition"))?;

        self.codec.validate_service_name(&descriptor.name)?;
        if descriptor.name == CATALOG_SERVICE {
            return Err(NamingError::conflict(
                &descriptor.name,
                format!("service name '{}' is reserved", CATALOG_SERVICE),
            )
            .into());
        }

        let mut taken = HashSet::new();
        let mut tools = Vec::new();

        for operation in &descriptor.operations {
            if !service.is_invocable(operation) {
                return Err(CatalogError::not_a_service(
                    &descriptor.name,
                    format!("operation '{}' has no invocable handler", operation.name),
                ));
            }

            if operation.excluded {
                debug!(
                    "Skipping excluded operation {}/{}",
                    descriptor.name, operation.name
                );
                continue;
            }

            let tool_name = self.codec.encode(&descriptor.name, &operation.name)?;
            if self.codec.is_known(&tool_name) || !taken.insert(tool_name.clone()) {
                return Err(NamingError::conflict(
                    &tool_name,
                    format!(
                        "tool name is already registered (service '{}', operation '{}')",
                        descriptor.name, operation.name
                    ),
                )
                .into());
            }

            tools.push(ToolDescriptor::from_operation(
                tool_name,
                &descriptor.name,
                operation,
            ));
        }

        for tool in &tools {
            if let Some(address) = &tool.address {
                self.codec.remember(&tool.name, address.clone());
            }
        }

        info!(
            "Registered service '{}' with {} tool(s)",
            descriptor.name,
            tools.len()
        );

        let index = self.registrations.len();
        self.registrations
            .push(ServiceRegistration::new(descriptor.clone(), tools));
        Ok(&self.registrations[index])
    }

    /// All tools, flattened in registration order then declaration order.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        let tools: Vec<ToolDescriptor> = self
            .registrations
            .iter()
            .flat_map(|registration| registration.tools().iter().cloned())
            .collect();

        debug!(
            "Listing {} tool(s): {:?}",
            tools.len(),
            tools.iter().map(|t| t.name.as_str()).collect::<Vec<_>>()
        );

        tools
    }

    /// Resolve a tool name produced by this catalog.
    pub fn resolve(&self, tool_name: &str) -> Option<ToolAddress> {
        self.codec.resolve(tool_name)
    }
}
