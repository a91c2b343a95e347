//! HTTP transport implementation.
//!
//! HTTP server with JSON-RPC over POST requests. Each POST carries one
//! envelope, answered through the router's single-envelope dispatch.
//! This allows standard HTTP clients (curl, browsers, etc.) to call tools.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::BridgeServer;
use crate::domains::gateway::Gateway;
use crate::domains::router::{InboundMessage, JsonRpcResponse, ServerIdentity, dispatch};

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<Gateway>,
    identity: Arc<ServerIdentity>,
    rpc_path: String,
}

impl AppState {
    pub fn new(server: &BridgeServer, rpc_path: impl Into<String>) -> Self {
        Self {
            gateway: server.gateway().clone(),
            identity: Arc::new(server.identity()),
            rpc_path: rpc_path.into(),
        }
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the axum application.
    pub fn app(&self, server: &BridgeServer) -> Router {
        let state = AppState::new(server, &self.config.rpc_path);

        let app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app.layer(cors)
        } else {
            app
        }
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: BridgeServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.app(&server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.identity.name,
        "version": state.identity.version,
        "transport": "HTTP",
        "endpoints": {
            "rpc": state.rpc_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "documentation": format!("Send POST requests to {} with JSON-RPC messages", state.rpc_path)
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle one JSON-RPC envelope.
///
/// Notifications are acknowledged with `202 Accepted` and no body; frames
/// that are not requests get an `Invalid Request` error.
#[instrument(skip_all)]
async fn handle_rpc(State(state): State<AppState>, Json(frame): Json<Value>) -> Response {
    match InboundMessage::parse(frame) {
        InboundMessage::Request(request) => {
            info!("Received JSON-RPC request: {}", request.method);
            let response = dispatch(state.gateway.as_ref(), &state.identity, request).await;
            (StatusCode::OK, Json(response)).into_response()
        }
        InboundMessage::Notification { method } => {
            debug!("Received notification: {}", method);
            StatusCode::ACCEPTED.into_response()
        }
        InboundMessage::Ignored(reason) => {
            debug!("Rejecting frame: {}", reason);
            (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::invalid_request(None, reason)),
            )
                .into_response()
        }
    }
}
