//! Conversation message types for Confab.
//!
//! A [`Message`] is one turn in a session: a role, a content payload that is
//! either plain text or a list of typed multimodal blocks, and a timestamp
//! used only for ordering.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::id::MessageId;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// Image reference inside a multimodal content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// A single typed block of multimodal content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Message payload: plain text or a sequence of typed content blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Flatten the content into the string form the completion service accepts.
    ///
    /// Plain text passes through unchanged. Multimodal content is sent as its
    /// JSON encoding rather than as structured blocks.
    pub fn as_completion_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => serde_json::to_string(parts).unwrap_or_default(),
        }
    }

    /// The text body if this is plain-text content.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Parts(_) => None,
        }
    }
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl From<&str> for MessageContent {
    fn from(value: &str) -> Self {
        MessageContent::Text(value.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(value: String) -> Self {
        MessageContent::Text(value)
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(value: Vec<ContentPart>) -> Self {
        MessageContent::Parts(value)
    }
}

/// Locale form older clients stored dates in, e.g. `10/18/2026, 3:00:00 PM`.
const LEGACY_DATE_FORMAT: &str = "%m/%d/%Y, %I:%M:%S %p";

/// Parse a stored message date: RFC 3339, or the legacy locale form.
pub fn parse_message_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw.trim(), LEGACY_DATE_FORMAT)
        .ok()
        .map(|date| date.and_utc())
}

fn unknown_date() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// A missing, null, or unreadable date sorts first instead of failing the
/// whole payload; stable sorting keeps such messages in server order.
fn deserialize_message_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(parse_message_date)
        .unwrap_or_else(unknown_date))
}

/// One turn in a conversation.
///
/// Messages are ordered by `(date, seq)`. `date` is not guaranteed unique;
/// `seq` breaks ties between messages stamped with the same instant (mask
/// context seeding stamps a whole batch at once).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: MessageId,
    #[serde(default = "unknown_date", deserialize_with = "deserialize_message_date")]
    pub date: DateTime<Utc>,
    pub role: MessageRole,
    pub content: MessageContent,
    #[serde(default)]
    pub seq: u32,
}

impl Message {
    /// Build a message with a fresh id, stamped now.
    pub fn new(role: MessageRole, content: impl Into<MessageContent>) -> Self {
        Self {
            id: MessageId::new(),
            date: Utc::now(),
            role,
            content: content.into(),
            seq: 0,
        }
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Re-stamp this message with a new instant and tie-breaking sequence number.
    pub fn restamped(mut self, date: DateTime<Utc>, seq: u32) -> Self {
        self.date = date;
        self.seq = seq;
        self
    }

    /// Total ordering used when sorting a session's messages.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
        assert!("robot".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_text_content_is_a_bare_string_on_the_wire() {
        let content = MessageContent::from("hi");
        assert_eq!(serde_json::to_string(&content).unwrap(), "\"hi\"");
    }

    #[test]
    fn test_multimodal_content_deserializes_from_block_list() {
        let json = r#"[
            {"type": "text", "text": "what is this?"},
            {"type": "image_url", "image_url": {"url": "https://example.com/cat.png"}}
        ]"#;
        let content: MessageContent = serde_json::from_str(json).unwrap();
        match &content {
            MessageContent::Parts(parts) => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(&parts[0], ContentPart::Text { text } if text == "what is this?"));
            }
            MessageContent::Text(_) => panic!("expected multimodal parts"),
        }
        assert!(content.as_text().is_none());
    }

    #[test]
    fn test_completion_text_for_plain_content() {
        assert_eq!(MessageContent::from("hello").as_completion_text(), "hello");
    }

    #[test]
    fn test_completion_text_encodes_parts_as_json() {
        let content = MessageContent::Parts(vec![ContentPart::Text {
            text: "caption".to_string(),
        }]);
        let encoded = content.as_completion_text();
        assert_eq!(encoded, r#"[{"type":"text","text":"caption"}]"#);
    }

    #[test]
    fn test_seq_defaults_to_zero_when_absent() {
        let json = r#"{
            "id": "abc",
            "date": "2025-01-01T00:00:00Z",
            "role": "assistant",
            "content": "hello"
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.seq, 0);
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.id.as_str(), "abc");
    }

    #[test]
    fn test_legacy_locale_date_is_parsed() {
        let json = r#"{
            "id": "old",
            "date": "10/18/2026, 3:00:00 PM",
            "role": "user",
            "content": "hi"
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.date.to_rfc3339(), "2026-10-18T15:00:00+00:00");
    }

    #[test]
    fn test_missing_id_and_date_still_decode() {
        let json = r#"{"role": "system", "content": "You translate."}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.date, DateTime::UNIX_EPOCH);
        assert!(!message.id.as_str().is_empty());
        assert_eq!(message.content.as_text(), Some("You translate."));
    }

    #[test]
    fn test_unreadable_date_sorts_first() {
        let json = r#"{"id": "x", "date": "yesterday-ish", "role": "user", "content": "hi"}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        let fresh = Message::user("now");
        assert_eq!(message.chronological_cmp(&fresh), Ordering::Less);
    }

    #[test]
    fn test_parse_message_date_forms() {
        assert!(parse_message_date("2025-01-01T00:00:00.250Z").is_some());
        assert!(parse_message_date("1/2/2025, 9:05:07 AM").is_some());
        assert!(parse_message_date("not a date").is_none());
    }

    #[test]
    fn test_chronological_cmp_breaks_ties_with_seq() {
        let now = Utc::now();
        let first = Message::user("a").restamped(now, 0);
        let second = Message::user("b").restamped(now, 1);
        let later = Message::user("c").restamped(now + Duration::seconds(1), 0);

        assert_eq!(first.chronological_cmp(&second), Ordering::Less);
        assert_eq!(second.chronological_cmp(&later), Ordering::Less);
        assert_eq!(later.chronological_cmp(&first), Ordering::Greater);
    }
}
