//! Ticket issuance: the authenticated `POST` that precedes every transport open.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::error::RealtimeError;
use crate::types::{RealtimeConfig, Ticket};

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Synchronous accessor for the current bearer credential.
///
/// Returning `None` is legal; the ticket request then goes out anonymously.
pub trait CredentialSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl CredentialSource for Option<String> {
    fn token(&self) -> Option<String> {
        self.clone()
    }
}

/// Shared, mutable bearer token holder.
#[derive(Default)]
pub struct TokenStore {
    token: RwLock<Option<String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write() = None;
    }
}

impl CredentialSource for TokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("token", &self.token.read().as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Issuer
// ---------------------------------------------------------------------------

/// Source of transport tickets.
#[async_trait]
pub trait TicketIssuer: Send + Sync {
    async fn issue(&self) -> Result<Ticket, RealtimeError>;
}

/// Requests tickets from `POST <base_url><ticket_path>`.
pub struct HttpTicketIssuer {
    http: reqwest::Client,
    url: String,
    credentials: Arc<dyn CredentialSource>,
}

impl HttpTicketIssuer {
    pub fn new(
        config: &RealtimeConfig,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, RealtimeError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RealtimeError::TicketRequest(format!("failed to build client: {e}")))?;
        Self::with_client(config, http, credentials)
    }

    /// Use a caller-built HTTP client (proxies, TLS roots, timeouts).
    pub fn with_client(
        config: &RealtimeConfig,
        http: reqwest::Client,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, RealtimeError> {
        Ok(Self {
            http,
            url: config.ticket_url()?,
            credentials,
        })
    }

    fn build_request(&self) -> reqwest::RequestBuilder {
        let request = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json");
        match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl TicketIssuer for HttpTicketIssuer {
    async fn issue(&self) -> Result<Ticket, RealtimeError> {
        let response = self
            .build_request()
            .send()
            .await
            .map_err(|e| RealtimeError::TicketRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RealtimeError::TicketRejected(status.as_u16()));
        }

        let ticket: Ticket = response
            .json()
            .await
            .map_err(|e| RealtimeError::TicketDecode(e.to_string()))?;
        debug!(expires_at = ?ticket.expires_at(), "realtime ticket issued");
        Ok(ticket)
    }
}
