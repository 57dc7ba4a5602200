use std::time::Duration;

use waynebot_common::WaynebotError;

/// Failures inside one connection attempt.
///
/// None of these reach the caller of `connect`/`close`; the connection
/// worker logs them and falls back to the reconnect path.
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error("ticket request failed: {0}")]
    TicketRequest(String),

    #[error("ticket request rejected with status {0}")]
    TicketRejected(u16),

    #[error("invalid ticket response: {0}")]
    TicketDecode(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("transport open timed out after {}s", .0.as_secs())]
    ConnectTimeout(Duration),
}

impl From<RealtimeError> for WaynebotError {
    fn from(err: RealtimeError) -> Self {
        WaynebotError::Realtime(err.to_string())
    }
}
