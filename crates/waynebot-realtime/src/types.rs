//! Connection state, wire envelope, ticket, and client configuration.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waynebot_config::WaynebotConfig;

use crate::backoff::{INITIAL_RETRY, MAX_RETRY};
use crate::error::RealtimeError;

// ---------------------------------------------------------------------------
// Connection State
// ---------------------------------------------------------------------------

/// Externally visible state of a realtime connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Wire Envelope
// ---------------------------------------------------------------------------

/// One inbound frame: `{"type": ..., "data": ...}`.
///
/// `data` is opaque here; see [`crate::router::ChatEvent`] for typed decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl WsEvent {
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Decode a text frame. Only a JSON object with a string `type` is an
    /// event; arrays and scalars are rejected.
    pub fn parse(frame: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<serde_json::Value>(frame)? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value),
            _ => Err(serde::de::Error::custom("event frame must be a JSON object")),
        }
    }
}

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

/// Short-lived, single-use credential for opening the transport.
///
/// Deserializes straight from the ticket endpoint's response body.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Ticket {
    #[serde(rename = "ticket")]
    value: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticket")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the realtime client.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Server origin, e.g. `https://chat.example.com`. Its scheme picks
    /// `ws` or `wss` for the transport.
    pub base_url: String,
    /// Path of the ticket endpoint (default: `/api/ws/ticket`).
    pub ticket_path: String,
    /// Path of the websocket endpoint (default: `/ws`).
    pub ws_path: String,
    /// First reconnect delay.
    pub initial_retry: Duration,
    /// Reconnect delay cap.
    pub max_retry: Duration,
    /// Upper bound on opening the transport.
    pub connect_timeout: Duration,
    /// Upper bound on the ticket request.
    pub request_timeout: Duration,
    /// Capacity of the router's event buses.
    pub event_buffer: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            ticket_path: "/api/ws/ticket".to_string(),
            ws_path: "/ws".to_string(),
            initial_retry: INITIAL_RETRY,
            max_retry: MAX_RETRY,
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(10),
            event_buffer: 256,
        }
    }
}

impl From<&WaynebotConfig> for RealtimeConfig {
    fn from(config: &WaynebotConfig) -> Self {
        let rt = &config.realtime;
        Self {
            base_url: config.server.base_url.trim().to_string(),
            ticket_path: config.server.ticket_path.clone(),
            ws_path: config.server.ws_path.clone(),
            initial_retry: Duration::from_millis(u64::from(rt.initial_retry_ms)),
            max_retry: Duration::from_millis(u64::from(rt.max_retry_ms)),
            connect_timeout: Duration::from_secs(u64::from(rt.connect_timeout_secs)),
            request_timeout: Duration::from_secs(u64::from(rt.request_timeout_secs)),
            event_buffer: rt.event_buffer as usize,
        }
    }
}

impl RealtimeConfig {
    /// Build a config for the given server origin with default tuning.
    pub fn for_server(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// URL of the ticket endpoint, on the same origin as the transport.
    pub fn ticket_url(&self) -> Result<String, RealtimeError> {
        let (secure, host) = self.origin()?;
        let scheme = if secure { "https" } else { "http" };
        Ok(format!("{scheme}://{host}{}", self.ticket_path))
    }

    /// Transport URL carrying `ticket` as its query credential.
    pub fn ws_url(&self, ticket: &Ticket) -> Result<String, RealtimeError> {
        let (secure, host) = self.origin()?;
        let scheme = if secure { "wss" } else { "ws" };
        Ok(format!(
            "{scheme}://{host}{}?ticket={}",
            self.ws_path,
            urlencoding::encode(ticket.as_str())
        ))
    }

    /// Security and host of `base_url`. Any path is ignored, like
    /// `location.host` in a browser, so both endpoints share one root.
    fn origin(&self) -> Result<(bool, &str), RealtimeError> {
        let base = self.base_url.trim();
        let (secure, rest) = if let Some(rest) = base.strip_prefix("https://") {
            (true, rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            (false, rest)
        } else {
            return Err(RealtimeError::InvalidEndpoint(format!(
                "base url must start with http:// or https://: {base}"
            )));
        };

        let host = rest.split('/').next().unwrap_or_default();
        if host.is_empty() {
            return Err(RealtimeError::InvalidEndpoint(format!(
                "base url has no host: {base}"
            )));
        }
        Ok((secure, host))
    }
}
