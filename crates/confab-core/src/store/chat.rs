//! One chat exchange: user turn, completion, assistant turn.
//!
//! Each turn is uploaded to the session server before it is appended
//! locally. A completion failure after the user turn was committed leaves
//! that turn in place without an answer.

use tracing::{debug, info, warn};

use confab_types::chat::{ChatPhase, ChatTurn};
use confab_types::completion::CompletionRequest;
use confab_types::error::{ChatError, StoreError};
use confab_types::event::StoreEvent;
use confab_types::id::SessionId;
use confab_types::message::{Message, MessageContent};

use super::{
    OP_COMPLETION, OP_UPLOAD_ASSISTANT_MESSAGE, OP_UPLOAD_USER_MESSAGE, SessionStore,
};
use crate::gateway::{CompletionGateway, SessionGateway};

impl<S: SessionGateway, C: CompletionGateway> SessionStore<S, C> {
    /// Send `prompt` in the current session and commit the assistant's reply.
    ///
    /// The exchange stays bound to the session that was current when it
    /// started, even if the selection changes while a request is in flight.
    ///
    /// # Errors
    ///
    /// [`ChatError`] carrying the last phase reached. If that phase is at or
    /// past [`ChatPhase::UserMessageCommitted`], the user turn remains in the
    /// session.
    pub async fn chat(&self, prompt: impl Into<MessageContent>) -> Result<ChatTurn, ChatError> {
        let session_id = self.current_session().await.id;
        let mut phase = ChatPhase::Idle;

        let user = Message::user(prompt);
        advance(&mut phase, ChatPhase::UserMessageBuilt, &session_id);

        self.session_gateway
            .add_message(&session_id, &user)
            .await
            .map_err(|e| stop(phase, self.fail(OP_UPLOAD_USER_MESSAGE, e)))?;
        advance(&mut phase, ChatPhase::UserMessageUploaded, &session_id);

        let history = self
            .commit_message(&session_id, user.clone())
            .await
            .map_err(|e| stop(phase, e))?;
        advance(&mut phase, ChatPhase::UserMessageCommitted, &session_id);

        let request = CompletionRequest::from_history(self.model.clone(), &history);
        advance(&mut phase, ChatPhase::CompletionRequested, &session_id);

        let response = self
            .completion_gateway
            .complete(&request)
            .await
            .map_err(|e| stop(phase, self.fail(OP_COMPLETION, e)))?;
        let reply = response
            .first_message()
            .map(|m| m.content.clone())
            .map_err(|e| stop(phase, self.fail(OP_COMPLETION, e)))?;
        advance(&mut phase, ChatPhase::CompletionReceived, &session_id);

        let assistant = Message::assistant(reply);
        self.session_gateway
            .add_message(&session_id, &assistant)
            .await
            .map_err(|e| stop(phase, self.fail(OP_UPLOAD_ASSISTANT_MESSAGE, e)))?;
        advance(&mut phase, ChatPhase::AssistantMessageUploaded, &session_id);

        self.commit_message(&session_id, assistant.clone())
            .await
            .map_err(|e| stop(phase, e))?;
        advance(&mut phase, ChatPhase::AssistantMessageCommitted, &session_id);

        info!(
            session_id = %session_id,
            history_len = history.len() + 1,
            "Chat exchange committed"
        );
        Ok(ChatTurn {
            session_id,
            user,
            assistant,
        })
    }

    /// Append a server-confirmed message to its session.
    ///
    /// Returns the session's message history after the append.
    async fn commit_message(
        &self,
        session_id: &SessionId,
        message: Message,
    ) -> Result<Vec<Message>, StoreError> {
        let message_id = message.id.clone();
        let role = message.role;
        let session = self
            .update_session(session_id, |mut session| {
                session.push_message(message);
                session
            })
            .await
            .inspect_err(|e| warn!(session_id = %session_id, error = %e, "Cannot commit message"))?;

        self.events.publish(StoreEvent::MessageCommitted {
            session_id: session_id.clone(),
            message_id,
            role,
        });
        Ok(session.messages)
    }
}

fn advance(phase: &mut ChatPhase, next: ChatPhase, session_id: &SessionId) {
    *phase = next;
    debug!(session_id = %session_id, phase = %next, "Chat phase");
}

fn stop(phase: ChatPhase, source: StoreError) -> ChatError {
    ChatError { phase, source }
}
