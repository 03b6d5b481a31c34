//! In-memory gateway doubles for store tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::DateTime;
use tokio::sync::Notify;

use confab_types::chat::Session;
use confab_types::completion::{
    CompletionChoice, CompletionMessage, CompletionRequest, CompletionResponse,
};
use confab_types::error::GatewayError;
use confab_types::id::{MaskId, SessionId};
use confab_types::message::{Message, MessageRole};

use super::SessionStore;
use crate::gateway::{CompletionGateway, SessionGateway};

pub(crate) fn test_store(
    sessions: MockSessionGateway,
    completion: MockCompletionGateway,
) -> SessionStore<MockSessionGateway, MockCompletionGateway> {
    SessionStore::new(sessions, completion, "test-model")
}

/// A server-side session last updated `offset_secs` after a fixed instant.
pub(crate) fn remote_session(topic: &str, offset_secs: i64) -> Session {
    let at = DateTime::from_timestamp(1_700_000_000 + offset_secs, 0).unwrap();
    let mut session = Session::empty();
    session.topic = topic.to_string();
    session.create_time = at;
    session.last_update = at;
    session
}

fn unavailable() -> GatewayError {
    GatewayError::Transport("connection refused".to_string())
}

#[derive(Default)]
struct SessionServer {
    sessions: Vec<Session>,
    mask_contexts: HashMap<MaskId, Vec<Message>>,
    fail_list: bool,
    fail_add_session: bool,
    fail_delete: bool,
    fail_mask_context: bool,
    fail_message_role: Option<MessageRole>,
    created: Vec<Session>,
    deleted: Vec<SessionId>,
    uploaded: Vec<(SessionId, Message)>,
}

/// Session server double: keeps sessions in memory and records every call.
#[derive(Clone, Default)]
pub(crate) struct MockSessionGateway {
    server: Arc<Mutex<SessionServer>>,
}

impl MockSessionGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn configure(self, f: impl FnOnce(&mut SessionServer)) -> Self {
        f(&mut self.server.lock().unwrap());
        self
    }

    pub(crate) fn with_remote_sessions(self, sessions: Vec<Session>) -> Self {
        self.configure(|s| s.sessions = sessions)
    }

    pub(crate) fn with_mask_context(self, mask_id: &str, context: Vec<Message>) -> Self {
        self.configure(|s| {
            s.mask_contexts.insert(MaskId::from(mask_id), context);
        })
    }

    pub(crate) fn failing_list(self) -> Self {
        self.configure(|s| s.fail_list = true)
    }

    pub(crate) fn failing_add_session(self) -> Self {
        self.configure(|s| s.fail_add_session = true)
    }

    pub(crate) fn failing_delete(self) -> Self {
        self.configure(|s| s.fail_delete = true)
    }

    pub(crate) fn failing_mask_context(self) -> Self {
        self.configure(|s| s.fail_mask_context = true)
    }

    /// Reject uploads of messages with this role.
    pub(crate) fn failing_message_role(self, role: MessageRole) -> Self {
        self.configure(|s| s.fail_message_role = Some(role))
    }

    pub(crate) fn created_sessions(&self) -> Vec<Session> {
        self.server.lock().unwrap().created.clone()
    }

    pub(crate) fn deleted_sessions(&self) -> Vec<SessionId> {
        self.server.lock().unwrap().deleted.clone()
    }

    pub(crate) fn uploaded_messages(&self) -> Vec<(SessionId, Message)> {
        self.server.lock().unwrap().uploaded.clone()
    }
}

impl SessionGateway for MockSessionGateway {
    async fn list_sessions(&self) -> Result<Vec<Session>, GatewayError> {
        let server = self.server.lock().unwrap();
        if server.fail_list {
            return Err(unavailable());
        }
        Ok(server.sessions.clone())
    }

    async fn add_session(&self, session: &Session) -> Result<(), GatewayError> {
        let mut server = self.server.lock().unwrap();
        if server.fail_add_session {
            return Err(unavailable());
        }
        server.created.push(session.clone());
        server.sessions.push(session.clone());
        Ok(())
    }

    async fn delete_session(&self, session_id: &SessionId) -> Result<(), GatewayError> {
        let mut server = self.server.lock().unwrap();
        if server.fail_delete {
            return Err(unavailable());
        }
        server.deleted.push(session_id.clone());
        server.sessions.retain(|s| &s.id != session_id);
        Ok(())
    }

    async fn add_message(&self, session_id: &SessionId, message: &Message) -> Result<(), GatewayError> {
        let mut server = self.server.lock().unwrap();
        if server.fail_message_role == Some(message.role) {
            return Err(GatewayError::Status {
                status: 500,
                body: "write failed".to_string(),
            });
        }
        server.uploaded.push((session_id.clone(), message.clone()));
        Ok(())
    }

    async fn mask_context(&self, mask_id: &MaskId) -> Result<Vec<Message>, GatewayError> {
        let server = self.server.lock().unwrap();
        if server.fail_mask_context {
            return Err(unavailable());
        }
        Ok(server.mask_contexts.get(mask_id).cloned().unwrap_or_default())
    }
}

struct CompletionServer {
    outcome: Result<CompletionResponse, GatewayError>,
    requests: Mutex<Vec<CompletionRequest>>,
    gate: Mutex<Option<Arc<Notify>>>,
    called: Notify,
}

/// Completion service double with a fixed outcome.
///
/// `hold` parks every call until the returned handle is notified, which lets
/// a test change the store while an exchange is in flight.
#[derive(Clone)]
pub(crate) struct MockCompletionGateway {
    server: Arc<CompletionServer>,
}

impl MockCompletionGateway {
    fn with_outcome(outcome: Result<CompletionResponse, GatewayError>) -> Self {
        Self {
            server: Arc::new(CompletionServer {
                outcome,
                requests: Mutex::new(Vec::new()),
                gate: Mutex::new(None),
                called: Notify::new(),
            }),
        }
    }

    pub(crate) fn replying(text: &str) -> Self {
        Self::with_outcome(Ok(CompletionResponse {
            id: Some("cmpl-test".to_string()),
            model: Some("test-model".to_string()),
            choices: vec![CompletionChoice {
                index: 0,
                message: CompletionMessage {
                    role: MessageRole::Assistant,
                    content: text.to_string(),
                },
                finish_reason: Some("stop".to_string()),
            }],
        }))
    }

    pub(crate) fn without_choices() -> Self {
        Self::with_outcome(Ok(CompletionResponse {
            id: None,
            model: None,
            choices: Vec::new(),
        }))
    }

    pub(crate) fn failing(error: GatewayError) -> Self {
        Self::with_outcome(Err(error))
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.server.requests.lock().unwrap().clone()
    }

    pub(crate) fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.server.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub(crate) async fn wait_until_called(&self) {
        self.server.called.notified().await;
    }
}

impl CompletionGateway for MockCompletionGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, GatewayError> {
        self.server.requests.lock().unwrap().push(request.clone());
        self.server.called.notify_one();
        let gate = self.server.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.server.outcome.clone()
    }
}
