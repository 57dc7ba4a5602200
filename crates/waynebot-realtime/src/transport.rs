//! Transport seam: the persistent push connection carrying event frames.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::error::RealtimeError;

/// An open transport.
#[async_trait]
pub trait Transport: Send {
    /// Next inbound text frame, or `Ok(None)` once the peer has closed.
    async fn recv(&mut self) -> Result<Option<String>, RealtimeError>;

    /// Close the transport. Must tolerate being called on a dead connection.
    async fn close(&mut self);
}

/// Opens transports. A successful return means the transport is open.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, RealtimeError>;
}

// ---------------------------------------------------------------------------
// tokio-tungstenite
// ---------------------------------------------------------------------------

/// Websocket connector backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

#[async_trait]
impl Connector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, RealtimeError> {
        let (ws, _response) = connect_async(url)
            .await
            .map_err(|e| RealtimeError::Transport(e.to_string()))?;
        Ok(Box::new(TungsteniteTransport { ws }))
    }
}

struct TungsteniteTransport {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Transport for TungsteniteTransport {
    async fn recv(&mut self) -> Result<Option<String>, RealtimeError> {
        while let Some(msg) = self.ws.next().await {
            match msg.map_err(|e| RealtimeError::Transport(e.to_string()))? {
                WsMessage::Text(text) => return Ok(Some(text.as_str().to_owned())),
                WsMessage::Binary(bytes) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => return Ok(Some(text)),
                    Err(_) => debug!(len = bytes.len(), "Dropping non-UTF-8 binary frame"),
                },
                WsMessage::Close(frame) => {
                    debug!(?frame, "Peer sent close frame");
                    return Ok(None);
                }
                // Ping/pong are answered by tungstenite itself.
                _ => {}
            }
        }
        Ok(None)
    }

    async fn close(&mut self) {
        if let Err(e) = self.ws.close(None).await {
            debug!(error = %e, "Websocket close handshake failed");
        }
    }
}
