//! Picks the configured transport and hands it the bridge server.

use tracing::info;

use super::{TransportConfig, TransportResult};
use crate::core::BridgeServer;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "tcp")]
use super::tcp::TcpTransport;

#[cfg(feature = "http")]
use super::http::HttpTransport;

/// Runs a [`BridgeServer`] over one transport.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Serve until the transport stops.
    ///
    /// STDIO returns when the client closes the session; TCP and HTTP only
    /// return on a listener error.
    pub async fn run(self, server: BridgeServer) -> TransportResult<()> {
        info!(
            "Serving {} v{} over {}",
            server.name(),
            server.version(),
            self.config.description()
        );

        match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => StdioTransport::run(server).await,
            #[cfg(feature = "tcp")]
            TransportConfig::Tcp(cfg) => TcpTransport::new(cfg).run(server).await,
            #[cfg(feature = "http")]
            TransportConfig::Http(cfg) => HttpTransport::new(cfg).run(server).await,
        }
    }
}
