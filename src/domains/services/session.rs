//! Session store service definition.
//!
//! Accumulates values per session id. `reset` is excluded from the tool
//! list but stays callable through the executor.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domains::catalog::OperationDescriptor;
use crate::domains::executor::{ExecutionError, ServiceHandler};

// ============================================================================
// Operation Input / Output
// ============================================================================

/// Input of `append`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AppendInput {
    /// Session to append to. Created on first use.
    pub session_id: String,

    /// Value to append.
    pub value: i64,
}

/// Input of `reset`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ResetInput {
    pub session_id: String,
}

/// Current contents of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionData {
    pub data: Vec<i64>,
}

// ============================================================================
// Service Definition
// ============================================================================

/// Session store service - per-session append-only lists.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Vec<i64>>>>,
}

impl SessionStore {
    /// Service name as registered in the catalog.
    pub const NAME: &'static str = "SessionStore";

    pub const APPEND: &'static str = "append";

    pub const RESET: &'static str = "reset";

    pub fn new() -> Self {
        Self::default()
    }

    /// Build the service handler. Handlers share this store's state.
    pub fn handler(&self) -> ServiceHandler {
        let append_store = self.clone();
        let reset_store = self.clone();

        ServiceHandler::builder(Self::NAME)
            .typed_operation(
                OperationDescriptor::new(Self::APPEND)
                    .description("Append a value to a session and return its contents."),
                move |_ctx, input: AppendInput| {
                    let store = append_store.clone();
                    async move { Ok::<_, ExecutionError>(store.append(input).await) }
                },
            )
            .typed_operation(
                OperationDescriptor::new(Self::RESET)
                    .description("Clear a session.")
                    .excluded(),
                move |_ctx, input: ResetInput| {
                    let store = reset_store.clone();
                    async move { Ok::<_, ExecutionError>(store.reset(&input.session_id).await) }
                },
            )
            .build()
    }

    /// Append a value and return the session's contents.
    pub async fn append(&self, input: AppendInput) -> SessionData {
        let mut sessions = self.sessions.lock().await;
        let data = sessions.entry(input.session_id.clone()).or_default();
        data.push(input.value);
        debug!("Session '{}' now holds {} value(s)", input.session_id, data.len());

        SessionData { data: data.clone() }
    }

    /// Remove a session, returning what it held.
    pub async fn reset(&self, session_id: &str) -> SessionData {
        let data = self.sessions.lock().await.remove(session_id).unwrap_or_default();
        info!("Session '{}' reset ({} value(s) dropped)", session_id, data.len());
        SessionData { data }
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
