//! MCP Operation Bridge Entry Point
//!
//! Initializes logging, loads configuration, picks the operation executor
//! and starts the bridge with the configured transport. Logging comes first
//! so configuration warnings reach stderr.

use anyhow::Result;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use mcp_operation_bridge::core::{
    BridgeConfig, BridgeServer, Config, LoggingConfig, TransportService,
};
use mcp_operation_bridge::Result as BridgeResult;
use mcp_operation_bridge::domains::executor::{HttpExecutor, OperationExecutor};
use mcp_operation_bridge::domains::gateway::Gateway;
use mcp_operation_bridge::domains::services::local_executor;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let logging = LoggingConfig::from_env();
    init_logging(&logging.level, logging.with_timestamps);

    // Load configuration from environment; a bad naming scheme stops startup
    let config = Config::from_env()?;

    info!("Starting {} v{}", config.server.name, config.server.version);

    let executor = build_executor(&config.bridge)?;
    let gateway = Gateway::new(executor, config.bridge.naming);
    let server = BridgeServer::new(config.clone(), gateway);

    info!(
        "Bridge initialized (naming: {})",
        config.bridge.naming.expected_format()
    );

    // Create and run the transport service
    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Forward to a remote endpoint when one is configured, otherwise serve the
/// built-in services in-process.
fn build_executor(bridge: &BridgeConfig) -> BridgeResult<Arc<dyn OperationExecutor>> {
    match &bridge.executor_endpoint {
        Some(endpoint) => Ok(Arc::new(HttpExecutor::new(
            endpoint.as_str(),
            bridge.executor_timeout(),
        )?)),
        None => Ok(Arc::new(local_executor(bridge.naming)?)),
    }
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout belongs to the STDIO transport.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
