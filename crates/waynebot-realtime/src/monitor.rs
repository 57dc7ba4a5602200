//! Reconnect tracking over the stream of state transitions.

use crate::types::ConnectionState;

/// Folds state transitions into connection health.
///
/// A `Connected` that follows an earlier `Connected` is a reconnect; data
/// pushed during the gap was missed, so consumers should refetch.
#[derive(Debug, Clone)]
pub struct ConnectionMonitor {
    state: ConnectionState,
    had_connection: bool,
    reconnects: u64,
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            had_connection: false,
            reconnects: 0,
        }
    }

    /// Record a transition. Returns `true` when it completes a reconnect.
    pub fn observe(&mut self, next: ConnectionState) -> bool {
        let previous = std::mem::replace(&mut self.state, next);
        if next != ConnectionState::Connected || previous == ConnectionState::Connected {
            return false;
        }
        if self.had_connection {
            self.reconnects += 1;
            return true;
        }
        self.had_connection = true;
        false
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Whether at least one reconnect has completed.
    pub fn was_reconnected(&self) -> bool {
        self.reconnects > 0
    }

    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new()
    }
}
