//! Background connection worker: ticket, open, pump frames, back off, repeat.

use std::sync::Arc;

use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backoff::Backoff;
use crate::error::RealtimeError;
use crate::shared::Shared;
use crate::ticket::TicketIssuer;
use crate::transport::{Connector, Transport};
use crate::types::{ConnectionState, RealtimeConfig, WsEvent};

/// How one connection attempt ended.
enum Outcome {
    /// The caller closed the connection; stop for good.
    Closed,
    /// The attempt never reached an open transport.
    Failed(RealtimeError),
    /// An open transport went away.
    Dropped,
}

/// Drives a single connection until it is closed.
///
/// Only one transport is ever alive at a time: attempts run strictly one
/// after another, and every await races the shared cancellation token.
pub(crate) struct Worker {
    shared: Arc<Shared>,
    issuer: Arc<dyn TicketIssuer>,
    connector: Arc<dyn Connector>,
    config: RealtimeConfig,
    backoff: Backoff,
    cancel: CancellationToken,
}

impl Worker {
    pub(crate) fn new(
        shared: Arc<Shared>,
        issuer: Arc<dyn TicketIssuer>,
        connector: Arc<dyn Connector>,
        config: RealtimeConfig,
    ) -> Self {
        let backoff = Backoff::new(config.initial_retry, config.max_retry);
        let cancel = shared.cancelled();
        Self {
            shared,
            issuer,
            connector,
            config,
            backoff,
            cancel,
        }
    }

    /// Run until closed. `Connecting` for the first attempt has already been
    /// reported by the caller.
    pub(crate) async fn run(mut self) {
        loop {
            match self.attempt().await {
                Outcome::Closed => break,
                Outcome::Failed(e) => warn!(error = %e, "Realtime connection attempt failed"),
                Outcome::Dropped => info!("Realtime connection lost"),
            }

            if !self.shared.report(ConnectionState::Disconnected) {
                break;
            }

            let delay = self.backoff.next_delay();
            info!(
                delay_ms = delay.as_millis() as u64,
                "Reconnecting in {}ms",
                delay.as_millis()
            );
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = sleep(delay) => {}
            }

            if !self.shared.report(ConnectionState::Connecting) {
                break;
            }
        }
        debug!("Realtime worker stopped");
    }

    async fn attempt(&mut self) -> Outcome {
        let issued = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Outcome::Closed,
            issued = self.issuer.issue() => issued,
        };
        let ticket = match issued {
            Ok(ticket) => ticket,
            Err(e) => return Outcome::Failed(e),
        };

        let url = match self.config.ws_url(&ticket) {
            Ok(url) => url,
            Err(e) => return Outcome::Failed(e),
        };
        info!(url = %url.split('?').next().unwrap_or(""), "Connecting to realtime endpoint");

        let limit = self.config.connect_timeout;
        let opened = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Outcome::Closed,
            opened = timeout(limit, self.connector.connect(&url)) => opened,
        };
        let mut transport = match opened {
            Ok(Ok(transport)) => transport,
            Ok(Err(e)) => return Outcome::Failed(e),
            Err(_elapsed) => return Outcome::Failed(RealtimeError::ConnectTimeout(limit)),
        };

        // Close may have won the race against the open.
        if !self.shared.report(ConnectionState::Connected) {
            transport.close().await;
            return Outcome::Closed;
        }
        self.backoff.reset();
        info!("Realtime connection established");

        self.pump(transport.as_mut()).await
    }

    /// Deliver frames until the transport goes away or the caller closes.
    async fn pump(&self, transport: &mut dyn Transport) -> Outcome {
        loop {
            let received = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                received = transport.recv() => Some(received),
            };
            let Some(received) = received else {
                transport.close().await;
                return Outcome::Closed;
            };

            match received {
                Ok(Some(frame)) => match WsEvent::parse(&frame) {
                    Ok(event) => {
                        if !self.shared.deliver(event) {
                            transport.close().await;
                            return Outcome::Closed;
                        }
                    }
                    Err(e) => debug!(error = %e, len = frame.len(), "Dropping malformed frame"),
                },
                Ok(None) => {
                    debug!("Realtime endpoint closed the connection");
                    return Outcome::Dropped;
                }
                Err(e) => {
                    warn!(error = %e, "Realtime transport error");
                    transport.close().await;
                    return Outcome::Dropped;
                }
            }
        }
    }
}
