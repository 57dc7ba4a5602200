//! Server location configuration.

use serde::{Deserialize, Serialize};

/// Where the waynebot server lives.
///
/// `base_url` plays the role of the page origin in the web client: an
/// `https` base selects `wss` for the realtime transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub ticket_path: String,
    pub ws_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            ticket_path: "/api/ws/ticket".into(),
            ws_path: "/ws".into(),
        }
    }
}
