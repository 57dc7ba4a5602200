//! State shared between a [`crate::Connection`] handle and its worker task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use tokio_util::sync::CancellationToken;

use crate::types::{ConnectionState, WsEvent};

/// Receives every successfully parsed inbound event.
pub type EventSink = Arc<dyn Fn(WsEvent) + Send + Sync>;
/// Receives every connection state transition.
pub type StateSink = Arc<dyn Fn(ConnectionState) + Send + Sync>;

/// Current state, the permanent closed flag, and the caller's sinks.
///
/// Every callback runs while holding `gate`, and the closed flag is checked
/// under it. `close` takes the same gate after setting the flag, so once
/// it returns no worker callback can still be running or start later. The
/// gate is re-entrant so a sink may call back into its own connection.
pub(crate) struct Shared {
    state: Mutex<ConnectionState>,
    closed: AtomicBool,
    gate: ReentrantMutex<()>,
    cancel: CancellationToken,
    on_event: EventSink,
    on_state: Option<StateSink>,
}

impl Shared {
    pub(crate) fn new(on_event: EventSink, on_state: Option<StateSink>) -> Self {
        Self {
            state: Mutex::new(ConnectionState::Disconnected),
            closed: AtomicBool::new(false),
            gate: ReentrantMutex::new(()),
            cancel: CancellationToken::new(),
            on_event,
            on_state,
        }
    }

    pub(crate) fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Token cancelled by [`Shared::close`]; the worker races it at every await.
    pub(crate) fn cancelled(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Record and announce a transition. Returns `false` once closed.
    pub(crate) fn report(&self, next: ConnectionState) -> bool {
        let _gate = self.gate.lock();
        if self.is_closed() {
            return false;
        }
        self.set_state(next);
        true
    }

    /// Hand a parsed event to the caller. Returns `false` once closed.
    pub(crate) fn deliver(&self, event: WsEvent) -> bool {
        let _gate = self.gate.lock();
        if self.is_closed() {
            return false;
        }
        (self.on_event)(event);
        true
    }

    /// Permanently close. Returns `false` if already closed.
    pub(crate) fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.cancel.cancel();

        let _gate = self.gate.lock();
        self.set_state(ConnectionState::Disconnected);
        true
    }

    fn set_state(&self, next: ConnectionState) {
        *self.state.lock() = next;
        if let Some(on_state) = &self.on_state {
            on_state(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Weak;

    fn recording() -> (Arc<Shared>, Arc<Mutex<Vec<ConnectionState>>>, Arc<Mutex<Vec<WsEvent>>>) {
        let states = Arc::new(Mutex::new(Vec::<ConnectionState>::new()));
        let events = Arc::new(Mutex::new(Vec::<WsEvent>::new()));
        let state_log = Arc::clone(&states);
        let event_log = Arc::clone(&events);
        let shared = Shared::new(
            Arc::new(move |event: WsEvent| event_log.lock().push(event)),
            Some(Arc::new(move |state: ConnectionState| state_log.lock().push(state))),
        );
        (Arc::new(shared), states, events)
    }

    #[test]
    fn starts_disconnected_and_open() {
        let (shared, states, _) = recording();
        assert_eq!(shared.state(), ConnectionState::Disconnected);
        assert!(!shared.is_closed());
        assert!(states.lock().is_empty());
    }

    #[test]
    fn report_updates_state_and_notifies() {
        let (shared, states, _) = recording();
        assert!(shared.report(ConnectionState::Connecting));
        assert!(shared.report(ConnectionState::Connected));
        assert_eq!(shared.state(), ConnectionState::Connected);
        assert_eq!(
            *states.lock(),
            vec![ConnectionState::Connecting, ConnectionState::Connected]
        );
    }

    #[test]
    fn close_is_idempotent() {
        let (shared, states, _) = recording();
        shared.report(ConnectionState::Connected);

        assert!(shared.close());
        assert!(!shared.close());
        assert!(shared.cancelled().is_cancelled());
        assert_eq!(shared.state(), ConnectionState::Disconnected);
        assert_eq!(
            *states.lock(),
            vec![ConnectionState::Connected, ConnectionState::Disconnected]
        );
    }

    #[test]
    fn nothing_is_reported_or_delivered_after_close() {
        let (shared, states, events) = recording();
        shared.close();

        assert!(!shared.report(ConnectionState::Connected));
        assert!(!shared.deliver(WsEvent::new("new_message", serde_json::Value::Null)));
        assert_eq!(shared.state(), ConnectionState::Disconnected);
        assert_eq!(*states.lock(), vec![ConnectionState::Disconnected]);
        assert!(events.lock().is_empty());
    }

    #[test]
    fn sink_may_close_its_own_connection() {
        let states = Arc::new(Mutex::new(Vec::<ConnectionState>::new()));
        let state_log = Arc::clone(&states);
        let shared = Arc::new_cyclic(|weak: &Weak<Shared>| {
            let weak = weak.clone();
            Shared::new(
                Arc::new(move |_event: WsEvent| {
                    if let Some(shared) = weak.upgrade() {
                        shared.close();
                    }
                }),
                Some(Arc::new(move |state: ConnectionState| state_log.lock().push(state))),
            )
        });

        shared.report(ConnectionState::Connected);
        assert!(shared.deliver(WsEvent::new("bye", serde_json::Value::Null)));
        assert!(shared.is_closed());
        assert_eq!(shared.state(), ConnectionState::Disconnected);
        assert_eq!(
            *states.lock(),
            vec![ConnectionState::Connected, ConnectionState::Disconnected]
        );
    }
}
