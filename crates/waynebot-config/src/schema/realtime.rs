//! Realtime connection tuning.

use serde::{Deserialize, Serialize};

/// Reconnect and timeout settings for the realtime client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeSchemaConfig {
    /// First reconnect delay in milliseconds (valid range: 1-600000).
    pub initial_retry_ms: u32,
    /// Backoff cap in milliseconds; must be >= `initial_retry_ms`.
    pub max_retry_ms: u32,
    /// Transport open timeout in seconds (valid range: 1-300).
    pub connect_timeout_secs: u32,
    /// Ticket request timeout in seconds (valid range: 1-300).
    pub request_timeout_secs: u32,
    /// Capacity of per-class event buses (valid range: 1-65536).
    pub event_buffer: u32,
}

impl Default for RealtimeSchemaConfig {
    fn default() -> Self {
        Self {
            initial_retry_ms: 1000,
            max_retry_ms: 30000,
            connect_timeout_secs: 15,
            request_timeout_secs: 10,
            event_buffer: 256,
        }
    }
}
