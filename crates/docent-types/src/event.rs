//! Events published by the orchestration layer so presentation can re-render.

use serde::{Deserialize, Serialize};

use crate::conversation::{ConversationId, Message};

/// User-visible in-flight status of a conversation stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStatus {
    /// A document upload is in flight.
    pub uploading: bool,
    /// A query is in flight and its answer has not arrived yet.
    pub composing: bool,
    /// Description of the most recent failure, cleared when a new action starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl ChatStatus {
    pub fn is_idle(&self) -> bool {
        !self.uploading && !self.composing
    }
}

/// A state change in a conversation stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    ConversationCreated {
        conversation_id: ConversationId,
        title: String,
    },
    ConversationSelected {
        conversation_id: Option<ConversationId>,
    },
    ConversationRenamed {
        conversation_id: ConversationId,
        title: String,
    },
    ConversationDeleted {
        conversation_id: ConversationId,
    },
    MessageAppended {
        conversation_id: ConversationId,
        message: Message,
    },
    SessionBound {
        conversation_id: ConversationId,
        session_id: String,
    },
    StatusChanged(ChatStatus),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_status_idle() {
        let mut status = ChatStatus::default();
        assert!(status.is_idle());
        status.composing = true;
        assert!(!status.is_idle());
    }

    #[test]
    fn test_chat_event_tagged_serde() {
        let event = ChatEvent::ConversationDeleted {
            conversation_id: ConversationId::new(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"conversation_deleted\""));
    }
}
