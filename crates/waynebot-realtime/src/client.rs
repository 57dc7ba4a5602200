//! Public entry point: [`RealtimeClient`] and the [`Connection`] handle.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::connection::Worker;
use crate::error::RealtimeError;
use crate::shared::{EventSink, Shared, StateSink};
use crate::ticket::{CredentialSource, HttpTicketIssuer, TicketIssuer};
use crate::transport::{Connector, TungsteniteConnector};
use crate::types::{ConnectionState, RealtimeConfig, WsEvent};

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Factory for auto-reconnecting realtime connections.
///
/// The client itself holds no connection state; every call to
/// [`RealtimeClient::connect`] starts an independent [`Connection`].
#[derive(Clone)]
pub struct RealtimeClient {
    config: RealtimeConfig,
    issuer: Arc<dyn TicketIssuer>,
    connector: Arc<dyn Connector>,
}

impl RealtimeClient {
    /// Client using HTTP ticket issuance and a tungstenite websocket.
    pub fn new(
        config: RealtimeConfig,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, RealtimeError> {
        let issuer = HttpTicketIssuer::new(&config, credentials)?;
        Ok(Self::with_parts(
            config,
            Arc::new(issuer),
            Arc::new(TungsteniteConnector),
        ))
    }

    /// Client with caller-supplied ticket issuance and transport.
    pub fn with_parts(
        config: RealtimeConfig,
        issuer: Arc<dyn TicketIssuer>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            config,
            issuer,
            connector,
        }
    }

    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Start connecting immediately and deliver every parsed event to
    /// `on_event`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect<E>(&self, on_event: E) -> Connection
    where
        E: Fn(WsEvent) + Send + Sync + 'static,
    {
        self.start(Arc::new(on_event), None)
    }

    /// Like [`RealtimeClient::connect`], also reporting every state
    /// transition to `on_state`. The first `Connecting` is reported before
    /// this returns.
    pub fn connect_with_state<E, S>(&self, on_event: E, on_state: S) -> Connection
    where
        E: Fn(WsEvent) + Send + Sync + 'static,
        S: Fn(ConnectionState) + Send + Sync + 'static,
    {
        self.start(Arc::new(on_event), Some(Arc::new(on_state)))
    }

    /// Channel flavour of [`RealtimeClient::connect_with_state`].
    ///
    /// Events arrive on an unbounded queue so delivery never blocks the
    /// worker; the watch channel always holds the latest state.
    pub fn subscribe(
        &self,
    ) -> (
        Connection,
        mpsc::UnboundedReceiver<WsEvent>,
        watch::Receiver<ConnectionState>,
    ) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);

        let connection = self.connect_with_state(
            move |event| {
                let _ = event_tx.send(event);
            },
            move |state| {
                state_tx.send_replace(state);
            },
        );
        (connection, event_rx, state_rx)
    }

    fn start(&self, on_event: EventSink, on_state: Option<StateSink>) -> Connection {
        let shared = Arc::new(Shared::new(on_event, on_state));
        shared.report(ConnectionState::Connecting);

        let worker = Worker::new(
            Arc::clone(&shared),
            Arc::clone(&self.issuer),
            Arc::clone(&self.connector),
            self.config.clone(),
        );
        let handle = tokio::spawn(worker.run());

        Connection {
            shared,
            worker: Some(handle),
        }
    }
}

impl fmt::Debug for RealtimeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Handle to one live, self-healing connection.
///
/// Dropping the handle closes the connection.
pub struct Connection {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Connection {
    /// Close permanently.
    ///
    /// Idempotent and non-blocking. Cancels any pending reconnect and tells
    /// the worker to close the live transport. State is `Disconnected` when
    /// this returns, and no event or state callback fires afterwards.
    pub fn close(&self) {
        if self.shared.close() {
            info!("Realtime connection closed");
        }
    }

    /// The last reported state.
    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Close and wait for the worker to finish closing the transport.
    pub async fn shutdown(mut self) {
        self.close();
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                warn!(error = %e, "Realtime worker ended abnormally");
            }
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.shared.close();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("state", &self.state())
            .field("closed", &self.is_closed())
            .finish()
    }
}
