//! Realtime push client for the waynebot chat server.
//!
//! A [`Connection`] fetches a short-lived ticket over HTTP, opens a
//! websocket carrying it, and hands every parsed `{"type", "data"}` frame to
//! the caller. Drops of any kind lead to a reconnect after a doubling delay
//! (1s up to 30s) that resets once a transport opens. Only
//! [`Connection::close`] stops it.
//!
//! ```no_run
//! use std::sync::Arc;
//! use waynebot_realtime::{RealtimeClient, RealtimeConfig, TokenStore};
//!
//! # async fn run() -> Result<(), waynebot_realtime::RealtimeError> {
//! let tokens = Arc::new(TokenStore::with_token("tok_123"));
//! let client = RealtimeClient::new(RealtimeConfig::for_server("https://chat.example.com"), tokens)?;
//! let connection = client.connect_with_state(
//!     |event| println!("{} {}", event.event_type, event.data),
//!     |state| println!("state: {state}"),
//! );
//! // ...
//! connection.close();
//! # Ok(())
//! # }
//! ```

mod backoff;
mod client;
mod connection;
mod error;
mod monitor;
pub mod router;
mod shared;
mod ticket;
mod transport;
mod types;


pub use backoff::{Backoff, INITIAL_RETRY, MAX_RETRY, MIN_RETRY};
pub use client::{Connection, RealtimeClient};
pub use error::RealtimeError;
pub use monitor::ConnectionMonitor;
pub use router::{ChatEvent, EventRouter};
pub use shared::{EventSink, StateSink};
pub use ticket::{CredentialSource, HttpTicketIssuer, TicketIssuer, TokenStore};
pub use transport::{Connector, Transport, TungsteniteConnector};
pub use types::{ConnectionState, RealtimeConfig, Ticket, WsEvent};
