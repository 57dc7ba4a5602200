//! Typed decoding and fan-out of inbound events.
//!
//! [`ChatEvent::classify`] turns the opaque [`WsEvent`] envelope into a typed
//! value, and [`EventRouter`] publishes each class on its own bus so any
//! number of independent listeners can follow just the traffic they need.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use waynebot_common::EventBus;

use crate::types::WsEvent;

/// Event type tags sent by the server.
pub mod event_types {
    pub const NEW_MESSAGE: &str = "new_message";
    pub const NEW_REACTION: &str = "new_reaction";
    pub const REMOVE_REACTION: &str = "remove_reaction";
    pub const AGENT_LLM_CALL: &str = "agent_llm_call";
    pub const AGENT_TOOL_EXECUTION: &str = "agent_tool_execution";
    pub const AGENT_CONTEXT_BUDGET: &str = "agent_context_budget";
    pub const AGENT_STATUS: &str = "agent_status";
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorType {
    Human,
    Agent,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Per-emoji reaction tally as seen by the receiving user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCount {
    pub emoji: String,
    pub count: u32,
    #[serde(default)]
    pub reacted: bool,
}

/// A chat message pushed by `new_message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub channel_id: i64,
    pub author_id: i64,
    #[serde(default)]
    pub author_type: AuthorType,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reactions: Option<Vec<ReactionCount>>,
}

/// Payload of `new_reaction` and `remove_reaction`.
///
/// `counts` is the full tally for the message after the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub message_id: i64,
    pub channel_id: i64,
    pub emoji: String,
    pub author_id: i64,
    #[serde(default)]
    pub author_type: AuthorType,
    #[serde(default)]
    pub counts: Vec<ReactionCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentEventKind {
    LlmCall,
    ToolExecution,
    ContextBudget,
    Status,
}

impl AgentEventKind {
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            event_types::AGENT_LLM_CALL => Some(Self::LlmCall),
            event_types::AGENT_TOOL_EXECUTION => Some(Self::ToolExecution),
            event_types::AGENT_CONTEXT_BUDGET => Some(Self::ContextBudget),
            event_types::AGENT_STATUS => Some(Self::Status),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LlmCall => event_types::AGENT_LLM_CALL,
            Self::ToolExecution => event_types::AGENT_TOOL_EXECUTION,
            Self::ContextBudget => event_types::AGENT_CONTEXT_BUDGET,
            Self::Status => event_types::AGENT_STATUS,
        }
    }
}

/// Agent activity. The payload shape differs per kind, so it stays raw apart
/// from the identifiers every kind carries.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentEvent {
    pub kind: AgentEventKind,
    pub persona_id: Option<i64>,
    pub channel_id: Option<i64>,
    pub data: serde_json::Value,
}

impl AgentEvent {
    pub fn new(kind: AgentEventKind, data: serde_json::Value) -> Self {
        Self {
            kind,
            persona_id: data.get("persona_id").and_then(|v| v.as_i64()),
            channel_id: data.get("channel_id").and_then(|v| v.as_i64()),
            data,
        }
    }

    /// The `status` field of an `agent_status` event.
    pub fn status(&self) -> Option<&str> {
        match self.kind {
            AgentEventKind::Status => self.data.get("status").and_then(|v| v.as_str()),
            _ => None,
        }
    }

    /// Whether this status means the agent is composing a reply.
    pub fn is_busy(&self) -> bool {
        matches!(self.status(), Some("thinking" | "tool_call"))
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    NewMessage(Message),
    ReactionAdded(ReactionEvent),
    ReactionRemoved(ReactionEvent),
    Agent(AgentEvent),
    /// Unknown type, or a known type whose payload did not decode.
    Other(WsEvent),
}

impl ChatEvent {
    pub fn classify(event: WsEvent) -> Self {
        let typed = match event.event_type.as_str() {
            event_types::NEW_MESSAGE => decode(&event).map(ChatEvent::NewMessage),
            event_types::NEW_REACTION => decode(&event).map(ChatEvent::ReactionAdded),
            event_types::REMOVE_REACTION => decode(&event).map(ChatEvent::ReactionRemoved),
            other => AgentEventKind::from_event_type(other)
                .map(|kind| ChatEvent::Agent(AgentEvent::new(kind, event.data.clone()))),
        };
        typed.unwrap_or(ChatEvent::Other(event))
    }
}

fn decode<T: DeserializeOwned>(event: &WsEvent) -> Option<T> {
    match T::deserialize(&event.data) {
        Ok(payload) => Some(payload),
        Err(e) => {
            debug!(event_type = %event.event_type, error = %e, "Event payload did not decode");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Publishes classified events on one bus per class.
///
/// Listeners of different classes are independent; no ordering holds
/// between them.
#[derive(Clone)]
pub struct EventRouter {
    messages: EventBus<Message>,
    reactions: EventBus<ReactionEvent>,
    agents: EventBus<AgentEvent>,
    other: EventBus<WsEvent>,
}

impl EventRouter {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: EventBus::new(capacity),
            reactions: EventBus::new(capacity),
            agents: EventBus::new(capacity),
            other: EventBus::new(capacity),
        }
    }

    pub fn messages(&self) -> &EventBus<Message> {
        &self.messages
    }

    /// Both additions and removals; each carries the updated tally.
    pub fn reactions(&self) -> &EventBus<ReactionEvent> {
        &self.reactions
    }

    pub fn agents(&self) -> &EventBus<AgentEvent> {
        &self.agents
    }

    pub fn other(&self) -> &EventBus<WsEvent> {
        &self.other
    }

    /// Classify and publish. Returns how many listeners received it.
    pub fn dispatch(&self, event: WsEvent) -> usize {
        match ChatEvent::classify(event) {
            ChatEvent::NewMessage(message) => self.messages.publish(message),
            ChatEvent::ReactionAdded(reaction) | ChatEvent::ReactionRemoved(reaction) => {
                self.reactions.publish(reaction)
            }
            ChatEvent::Agent(agent) => self.agents.publish(agent),
            ChatEvent::Other(event) => self.other.publish(event),
        }
    }

    /// An event callback that feeds this router, for
    /// [`crate::RealtimeClient::connect`].
    pub fn sink(&self) -> impl Fn(WsEvent) + Send + Sync + 'static {
        let router = self.clone();
        move |event| {
            router.dispatch(event);
        }
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new(256)
    }
}
