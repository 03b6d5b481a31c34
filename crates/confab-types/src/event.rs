//! Event types published by the session store.
//!
//! `StoreEvent` is broadcast after every confirmed state change and after
//! every failed remote operation, so a UI or test can observe failures that
//! leave local state untouched.

use serde::{Deserialize, Serialize};

use crate::id::{MessageId, SessionId};
use crate::message::MessageRole;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// The session list was replaced from the server.
    SessionsLoaded { count: usize, current_index: usize },

    SessionSelected { index: usize },

    /// A session was confirmed by the server and inserted at index 0.
    SessionCreated { session_id: SessionId },

    /// A session was confirmed deleted and removed locally.
    SessionDeleted {
        session_id: SessionId,
        current_index: usize,
        /// Whether an empty session had to be synthesized to keep the list non-empty.
        replaced_with_empty: bool,
    },

    /// A message was confirmed by the server and appended locally.
    MessageCommitted {
        session_id: SessionId,
        message_id: MessageId,
        role: MessageRole,
    },

    /// A remote operation failed; local state is unchanged.
    OperationFailed { operation: String, error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = StoreEvent::SessionSelected { index: 2 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"session_selected","index":2}"#);
    }

    #[test]
    fn test_failure_event_roundtrip() {
        let event = StoreEvent::OperationFailed {
            operation: "load sessions".to_string(),
            error: "transport error: refused".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: StoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
