//! Chat session types for Confab.
//!
//! A [`Session`] is a persisted conversation: identity, display topic, the
//! ordered message history, and the mask it was created from. [`ChatPhase`]
//! names the steps of a single send/receive exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::id::SessionId;
use crate::mask::{DEFAULT_TOPIC, Mask};
use crate::message::Message;

/// A conversation between the user and the assistant.
///
/// `create_time` and `last_update` travel as epoch milliseconds.
/// `messages` is kept sorted chronologically by every store mutation and
/// `last_update` never moves backwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub topic: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub create_time: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_update: DateTime<Utc>,
    #[serde(default)]
    pub mask: Mask,
}

impl Session {
    /// A fresh session with the default topic, default mask, and no messages.
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            topic: DEFAULT_TOPIC.to_string(),
            messages: Vec::new(),
            create_time: now,
            last_update: now,
            mask: Mask::empty(),
        }
    }

    /// A fresh session whose topic and mask come from a template.
    ///
    /// The mask's context is not copied; seeding is the store's job.
    pub fn from_mask(mask: Mask) -> Self {
        Self {
            topic: mask.name.clone(),
            mask,
            ..Self::empty()
        }
    }

    /// Stable sort of `messages` by `(date, seq)`.
    pub fn sort_messages(&mut self) {
        self.messages.sort_by(Message::chronological_cmp);
    }

    /// Append a message and refresh `last_update`.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.touch(Utc::now());
    }

    /// Move `last_update` forward to `at`, never backwards.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.last_update {
            self.last_update = at;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// States of one chat exchange, in the order they are reached.
///
/// A failed exchange reports the last phase it reached; there is no
/// separate failed state because the failure travels as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatPhase {
    Idle,
    UserMessageBuilt,
    UserMessageUploaded,
    UserMessageCommitted,
    CompletionRequested,
    CompletionReceived,
    AssistantMessageUploaded,
    AssistantMessageCommitted,
}

impl fmt::Display for ChatPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChatPhase::Idle => "idle",
            ChatPhase::UserMessageBuilt => "user_message_built",
            ChatPhase::UserMessageUploaded => "user_message_uploaded",
            ChatPhase::UserMessageCommitted => "user_message_committed",
            ChatPhase::CompletionRequested => "completion_requested",
            ChatPhase::CompletionReceived => "completion_received",
            ChatPhase::AssistantMessageUploaded => "assistant_message_uploaded",
            ChatPhase::AssistantMessageCommitted => "assistant_message_committed",
        };
        f.write_str(name)
    }
}

impl ChatPhase {
    /// Whether the user's message had been committed locally when the exchange stopped.
    pub fn user_message_committed(self) -> bool {
        self >= ChatPhase::UserMessageCommitted
    }
}

/// Both halves of a completed exchange, as committed to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub session_id: SessionId,
    pub user: Message,
    pub assistant: Message,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_empty_session_defaults() {
        let session = Session::empty();
        assert_eq!(session.topic, DEFAULT_TOPIC);
        assert!(session.is_empty());
        assert_eq!(session.create_time, session.last_update);
    }

    #[test]
    fn test_from_mask_takes_topic_but_not_context() {
        let mut mask = Mask::named("m1", "Translator");
        mask.context.push(Message::user("seed"));
        let session = Session::from_mask(mask);
        assert_eq!(session.topic, "Translator");
        assert_eq!(session.mask.name, "Translator");
        assert!(session.messages.is_empty());
    }

    #[test]
    fn test_session_wire_format_uses_epoch_millis() {
        let json = r#"{
            "id": "s1",
            "topic": "Hello",
            "messages": [],
            "createTime": 1700000000000,
            "lastUpdate": 1700000005000,
            "mask": {"id": "m", "name": "Hello", "avatar": "gpt-bot", "context": []}
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.create_time.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(session.last_update.timestamp_millis(), 1_700_000_005_000);

        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["lastUpdate"], 1_700_000_005_000_i64);
        assert!(value.get("last_update").is_none());
    }

    #[test]
    fn test_sort_messages_orders_by_date_then_seq() {
        let now = Utc::now();
        let mut session = Session::empty();
        session.messages = vec![
            Message::user("third").restamped(now + Duration::seconds(5), 0),
            Message::user("second").restamped(now, 1),
            Message::user("first").restamped(now, 0),
        ];
        session.sort_messages();
        let order: Vec<_> = session
            .messages
            .iter()
            .map(|m| m.content.as_text().unwrap())
            .collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_touch_never_moves_backwards() {
        let mut session = Session::empty();
        let before = session.last_update;
        session.touch(before - Duration::hours(1));
        assert_eq!(session.last_update, before);
        session.touch(before + Duration::hours(1));
        assert!(session.last_update > before);
    }

    #[test]
    fn test_push_message_bumps_last_update() {
        let mut session = Session::empty();
        session.last_update -= Duration::minutes(10);
        let before = session.last_update;
        session.push_message(Message::user("hi"));
        assert_eq!(session.messages.len(), 1);
        assert!(session.last_update > before);
    }

    #[test]
    fn test_chat_phase_ordering() {
        assert!(ChatPhase::Idle < ChatPhase::AssistantMessageCommitted);
        assert!(!ChatPhase::UserMessageUploaded.user_message_committed());
        assert!(ChatPhase::CompletionRequested.user_message_committed());
        assert_eq!(ChatPhase::CompletionRequested.to_string(), "completion_requested");
    }
}
