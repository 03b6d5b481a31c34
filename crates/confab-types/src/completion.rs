//! Wire types for the chat-completion service.
//!
//! The request carries the whole confirmed history of a session flattened to
//! `{role, content}` string pairs. Only the first choice of the response is used.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::message::{Message, MessageRole};

/// A single `{role, content}` pair as the completion service sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: MessageRole,
    pub content: String,
}

impl From<&Message> for CompletionMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.as_completion_text(),
        }
    }
}

/// Request body for `POST {base}/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<CompletionMessage>,
    #[serde(default)]
    pub stream: bool,
}

impl CompletionRequest {
    /// Build a non-streaming request from a session's message history.
    pub fn from_history<'a>(
        model: impl Into<String>,
        history: impl IntoIterator<Item = &'a Message>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: history.into_iter().map(CompletionMessage::from).collect(),
            stream: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub index: u32,
    pub message: CompletionMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Response body of the completion service.
///
/// Fields beyond `choices` (id, usage, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    /// The message of the first choice.
    ///
    /// # Errors
    ///
    /// [`GatewayError::MalformedResponse`] when the service returned no choices.
    pub fn first_message(&self) -> Result<&CompletionMessage, GatewayError> {
        self.choices
            .first()
            .map(|choice| &choice.message)
            .ok_or_else(|| GatewayError::MalformedResponse("response has no choices".to_string()))
    }
}
