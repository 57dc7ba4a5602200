//! One logging task per event class.

use std::future::Future;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use waynebot_realtime::router::{AgentEvent, Message, ReactionEvent};
use waynebot_realtime::{ConnectionMonitor, ConnectionState, EventRouter, WsEvent};

pub fn spawn_all(router: &EventRouter) {
    spawn("messages", router.messages().subscribe(), log_message);
    spawn("reactions", router.reactions().subscribe(), log_reaction);
    spawn("agents", router.agents().subscribe(), log_agent);
    spawn("other", router.other().subscribe(), log_other);
}

/// Log state transitions until `shutdown` resolves. Buffered transitions are
/// handled first.
pub async fn follow_states<F>(
    mut states: mpsc::UnboundedReceiver<ConnectionState>,
    monitor: &mut ConnectionMonitor,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            biased;
            Some(state) = states.recv() => {
                info!(state = %state, "Connection state changed");
                if monitor.observe(state) {
                    info!(
                        reconnects = monitor.reconnects(),
                        "Reconnected; events sent while disconnected were missed"
                    );
                }
            }
            _ = &mut shutdown => break,
        }
    }
}

fn spawn<T, F>(name: &'static str, mut rx: broadcast::Receiver<T>, log: F)
where
    T: Clone + Send + 'static,
    F: Fn(T) + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(listener = name, skipped, "Listener fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn log_message(message: Message) {
    info!(
        channel = message.channel_id,
        author = %message.author_name,
        id = message.id,
        "{}",
        message.content
    );
}

fn log_reaction(reaction: ReactionEvent) {
    let total: u32 = reaction
        .counts
        .iter()
        .filter(|c| c.emoji == reaction.emoji)
        .map(|c| c.count)
        .sum();
    info!(
        channel = reaction.channel_id,
        message = reaction.message_id,
        emoji = %reaction.emoji,
        total,
        "Reactions updated"
    );
}

fn log_agent(agent: AgentEvent) {
    match agent.status() {
        Some(status) => info!(
            persona = ?agent.persona_id,
            channel = ?agent.channel_id,
            status,
            "Agent status"
        ),
        None => debug!(
            kind = agent.kind.as_str(),
            persona = ?agent.persona_id,
            data = %agent.data,
            "Agent activity"
        ),
    }
}

fn log_other(event: WsEvent) {
    debug!(event_type = %event.event_type, data = %event.data, "Unrouted event");
}
