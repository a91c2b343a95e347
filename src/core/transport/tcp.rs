//! TCP transport implementation.
//!
//! Raw TCP socket transport with newline-delimited JSON-RPC messages. Each
//! connection is driven by its own message router.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::BridgeServer;
use crate::domains::gateway::Gateway;
use crate::domains::router::MessageRouter;

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    /// Create a new TCP transport with the given config.
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the TCP transport.
    pub async fn run(self, server: BridgeServer) -> TransportResult<()> {
        let addr = self.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (JSON-RPC over TCP)", addr);
        Self::serve(listener, server.router()).await
    }

    /// Accept connections forever, one router per connection.
    pub async fn serve(
        listener: TcpListener,
        router: MessageRouter<Gateway>,
    ) -> TransportResult<()> {
        loop {
            match listener.accept().await {
                Ok((stream, peer_addr)) => {
                    info!("Accepted connection from {}", peer_addr);

                    // Set TCP_NODELAY to disable Nagle's algorithm
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!("Failed to set TCP_NODELAY for {}: {}", peer_addr, e);
                    }

                    let router = router.clone();

                    // Spawn a task to handle this connection
                    tokio::spawn(async move {
                        Self::handle_connection(router, stream, peer_addr).await;
                    });
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    // Small delay to avoid spinning on persistent errors
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
            }
        }
    }

    /// Handle a single TCP connection.
    ///
    /// Lines are parsed as JSON and fed to the router; responses are written
    /// back one per line. End of input drains the router before closing.
    async fn handle_connection(
        router: MessageRouter<Gateway>,
        stream: TcpStream,
        peer_addr: std::net::SocketAddr,
    ) {
        let (reader, mut writer) = stream.into_split();
        let (inbound, mut outbound, handle) = router.connect().into_parts();

        let writer_task = tokio::spawn(async move {
            while let Some(response) = outbound.recv().await {
                let mut line = match serde_json::to_vec(&response) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("Failed to encode response: {}", e);
                        continue;
                    }
                };
                line.push(b'\n');
                if let Err(e) = writer.write_all(&line).await {
                    warn!("Failed to write to {}: {}", peer_addr, e);
                    break;
                }
            }
            if let Err(e) = writer.shutdown().await {
                debug!("Failed to shut down writer for {}: {}", peer_addr, e);
            }
        });

        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match serde_json::from_str::<Value>(&line) {
                    Ok(frame) => {
                        if inbound.send(frame).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => debug!("Ignoring malformed line from {}: {}", peer_addr, e),
                },
                Ok(None) => break,
                Err(e) => {
                    warn!("Error while reading from {}: {}", peer_addr, e);
                    break;
                }
            }
        }

        // Closing the inbound side lets the router drain queued requests.
        drop(inbound);
        handle.join().await;
        if let Err(e) = writer_task.await {
            warn!("Writer for {} failed: {}", peer_addr, e);
        }
        info!("Client {} disconnected", peer_addr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::naming::NamingScheme;
    use crate::domains::router::ServerIdentity;
    use crate::domains::services::local_executor;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_line_delimited_session() {
        let scheme = NamingScheme::default();
        let gateway = Gateway::new(Arc::new(local_executor(scheme).unwrap()), scheme);
        let router = MessageRouter::new(Arc::new(gateway), ServerIdentity::default());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(TcpTransport::serve(listener, router));

        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();

        let frames = [
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call", "params": {
                "name": "Greeter.hello", "arguments": {"name": "TCP"}
            }}),
        ];
        let mut payload = String::from("not json\n\n");
        for frame in frames {
            payload.push_str(&frame.to_string());
            payload.push('\n');
        }
        writer.write_all(payload.as_bytes()).await.unwrap();
        writer.shutdown().await.unwrap();

        let mut lines = BufReader::new(reader).lines();
        let mut responses = Vec::new();
        while let Some(line) = tokio::time::timeout(Duration::from_secs(5), lines.next_line())
            .await
            .unwrap()
            .unwrap()
        {
            responses.push(serde_json::from_str::<Value>(&line).unwrap());
        }

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["tools"][0]["name"], "Greeter.hello");
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(
            responses[1]["result"]["structuredContent"]["message"],
            "Hello, TCP"
        );
    }

    #[tokio::test]
    async fn test_connection_finishes_when_peer_vanishes() {
        let scheme = NamingScheme::default();
        let gateway = Gateway::new(Arc::new(local_executor(scheme).unwrap()), scheme);
        let router = MessageRouter::new(Arc::new(gateway), ServerIdentity::default());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut client = TcpStream::connect(addr).await.unwrap();
        let (stream, peer_addr) = listener.accept().await.unwrap();
        let connection = tokio::spawn(TcpTransport::handle_connection(router, stream, peer_addr));

        let request = json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"});
        client
            .write_all(format!("{}\n", request).as_bytes())
            .await
            .unwrap();
        drop(client);

        tokio::time::timeout(Duration::from_secs(5), connection)
            .await
            .expect("connection did not finish")
            .unwrap();
    }
}
