//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the bridge,
//! including error handling, configuration, the rmcp server handler,
//! and transport layer abstractions.

pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::{BridgeConfig, Config, LoggingConfig};
pub use error::{Error, Result};
pub use server::BridgeServer;
pub use transport::{TransportConfig, TransportService};
