//! Events delivered by the transport

use crate::ConversationId;
use serde::{Deserialize, Serialize};

/// Where the payload came from. The machine treats both the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Free-form text typed by the user
    #[default]
    Text,
    /// A value tag echoed back from a rendered option
    Selection,
}

/// A single user input for one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub kind: InputKind,
    pub payload: String,
}

impl Event {
    pub fn text(payload: impl Into<String>) -> Self {
        Self {
            kind: InputKind::Text,
            payload: payload.into(),
        }
    }

    pub fn selection(payload: impl Into<String>) -> Self {
        Self {
            kind: InputKind::Selection,
            payload: payload.into(),
        }
    }

    /// Payload without surrounding whitespace
    pub fn trimmed(&self) -> &str {
        self.payload.trim()
    }
}

/// An event as delivered by the transport, tagged with its conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub conversation_id: ConversationId,
    #[serde(flatten)]
    pub event: Event,
}

impl InboundEvent {
    pub fn new(conversation_id: ConversationId, event: Event) -> Self {
        Self {
            conversation_id,
            event,
        }
    }
}
