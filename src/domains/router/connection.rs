//! Per-connection message router.
//!
//! One router task serves one connection: it reads JSON frames from an
//! inbound channel, answers each request through [`dispatch`], and writes the
//! responses to an outbound channel in arrival order. The task only suspends
//! on channel receive/send and while the provider is working.
//!
//! Lifecycle: `Idle -> Routing -> Draining -> Closed`. Closing the inbound
//! channel drains every buffered request before the outbound channel closes.
//! Cancellation stops immediately; a response still in flight is dropped.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use super::dispatch::{ServerIdentity, dispatch};
use super::envelope::{InboundMessage, JsonRpcResponse};
use super::provider::ToolProvider;

/// Default capacity of the inbound and outbound channels.
pub const DEFAULT_ROUTER_CAPACITY: usize = 32;

/// Lifecycle state of a router connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Idle,
    Routing,
    Draining,
    Closed,
}

impl fmt::Display for RouterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Routing => "routing",
            Self::Draining => "draining",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Factory for router connections sharing one provider.
pub struct MessageRouter<P: ?Sized> {
    provider: Arc<P>,
    identity: Arc<ServerIdentity>,
    capacity: usize,
}

impl<P: ?Sized> Clone for MessageRouter<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            identity: self.identity.clone(),
            capacity: self.capacity,
        }
    }
}

impl<P> MessageRouter<P>
where
    P: ToolProvider + ?Sized + 'static,
{
    pub fn new(provider: Arc<P>, identity: ServerIdentity) -> Self {
        Self {
            provider,
            identity: Arc::new(identity),
            capacity: DEFAULT_ROUTER_CAPACITY,
        }
    }

    /// Set the channel capacity used by new connections (at least 1).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Start a router task for a new connection.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect(&self) -> RouterConnection {
        let id = Uuid::new_v4();
        let (inbound_tx, inbound_rx) = mpsc::channel(self.capacity);
        let (outbound_tx, outbound_rx) = mpsc::channel(self.capacity);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(RouterState::Idle);

        let task = RouterTask {
            provider: self.provider.clone(),
            identity: self.identity.clone(),
            inbound: inbound_rx,
            outbound: outbound_tx,
            cancel: cancel_rx,
            state: state_tx,
        };

        let task = tokio::spawn(task.run().instrument(info_span!("router", connection = %id)));

        RouterConnection {
            inbound: inbound_tx,
            outbound: outbound_rx,
            handle: RouterHandle {
                id,
                cancel: cancel_tx,
                state: state_rx,
                task: Some(task),
            },
        }
    }
}

/// The caller's side of one router connection.
pub struct RouterConnection {
    inbound: mpsc::Sender<Value>,
    outbound: mpsc::Receiver<JsonRpcResponse>,
    handle: RouterHandle,
}

impl RouterConnection {
    /// Queue an inbound frame. Returns `false` once the router stopped reading.
    pub async fn send(&self, frame: Value) -> bool {
        self.inbound.send(frame).await.is_ok()
    }

    /// Next response, or `None` once the router has closed.
    pub async fn recv(&mut self) -> Option<JsonRpcResponse> {
        self.outbound.recv().await
    }

    pub fn handle(&self) -> &RouterHandle {
        &self.handle
    }

    /// Split into the inbound sender, outbound receiver and task handle.
    ///
    /// Dropping the sender starts draining.
    pub fn into_parts(
        self,
    ) -> (
        mpsc::Sender<Value>,
        mpsc::Receiver<JsonRpcResponse>,
        RouterHandle,
    ) {
        (self.inbound, self.outbound, self.handle)
    }
}

/// Controls a running router task.
///
/// Dropping the handle cancels the router.
pub struct RouterHandle {
    id: Uuid,
    cancel: watch::Sender<bool>,
    state: watch::Receiver<RouterState>,
    task: Option<JoinHandle<()>>,
}

impl RouterHandle {
    /// Connection identifier used in log spans.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> RouterState {
        *self.state.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<RouterState> {
        self.state.clone()
    }

    /// Signal cancellation without waiting for the task.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Cancel the router and wait for its task to finish.
    pub async fn shutdown(mut self) {
        self.cancel();
        self.wait().await;
    }

    /// Wait for the router to finish on its own (inbound closed).
    pub async fn join(mut self) {
        self.wait().await;
    }

    async fn wait(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        match task.await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => debug!("Router {} task was cancelled", self.id),
            Err(e) => warn!("Router {} task failed: {}", self.id, e),
        }
    }
}

impl Drop for RouterHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancel.send_replace(true);
        }
    }
}

impl fmt::Debug for RouterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterHandle")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

struct RouterTask<P: ?Sized> {
    provider: Arc<P>,
    identity: Arc<ServerIdentity>,
    inbound: mpsc::Receiver<Value>,
    outbound: mpsc::Sender<JsonRpcResponse>,
    cancel: watch::Receiver<bool>,
    state: watch::Sender<RouterState>,
}

impl<P> RouterTask<P>
where
    P: ToolProvider + ?Sized,
{
    async fn run(mut self) {
        self.transition(RouterState::Routing);

        loop {
            let frame = tokio::select! {
                biased;
                _ = cancelled(&mut self.cancel) => {
                    info!("Router cancelled");
                    break;
                }
                frame = self.inbound.recv() => match frame {
                    Some(frame) => frame,
                    None => {
                        debug!("Inbound stream closed");
                        break;
                    }
                },
            };

            let request = match InboundMessage::parse(frame) {
                InboundMessage::Request(request) => request,
                InboundMessage::Notification { method } => {
                    debug!("Ignoring notification '{}'", method);
                    continue;
                }
                InboundMessage::Ignored(reason) => {
                    debug!("Ignoring inbound frame: {}", reason);
                    continue;
                }
            };

            let id = request.id.clone();
            let response = tokio::select! {
                biased;
                _ = cancelled(&mut self.cancel) => {
                    info!("Router cancelled, abandoning request {}", id);
                    break;
                }
                response = dispatch(&*self.provider, &self.identity, request) => response,
            };

            tokio::select! {
                biased;
                _ = cancelled(&mut self.cancel) => {
                    info!("Router cancelled, dropping response to {}", id);
                    break;
                }
                sent = self.outbound.send(response) => {
                    if sent.is_err() {
                        debug!("Outbound stream closed");
                        break;
                    }
                }
            }
        }

        self.transition(RouterState::Draining);
        self.inbound.close();

        let RouterTask { outbound, state, .. } = self;
        drop(outbound);
        state.send_replace(RouterState::Closed);
        info!("Router closed");
    }

    fn transition(&self, next: RouterState) {
        let previous = self.state.send_replace(next);
        debug!("Router state {} -> {}", previous, next);
    }
}

/// Resolves once cancellation is requested or the handle is gone.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let _ = cancel.wait_for(|cancelled| *cancelled).await;
}
