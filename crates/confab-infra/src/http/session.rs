//! HttpSessionGateway -- [`SessionGateway`] over the session server's REST API.
//!
//! Endpoints (relative to the configured base URL):
//!
//! | Operation       | Request                                        |
//! |-----------------|------------------------------------------------|
//! | list sessions   | `GET /session/all`                             |
//! | add session     | `POST /session/add` (session JSON)             |
//! | delete session  | `POST /session/delete?sessionId=<id>`          |
//! | add message     | `POST /session/message/add?sessionId=<id>`     |
//! | mask context    | `GET /session/mask/context?maskId=<id>`        |

use serde::Deserialize;
use tracing::debug;

use confab_core::gateway::SessionGateway;
use confab_types::chat::Session;
use confab_types::error::GatewayError;
use confab_types::id::{MaskId, SessionId};
use confab_types::message::{Message, MessageContent, MessageRole};

use super::{decode_json, ensure_success, join_url, transport_error};

/// Mask context entry as the server returns it.
///
/// The store re-stamps every seed message, so only role and content are
/// read; whatever `id` or `date` the server sends is ignored.
#[derive(Deserialize)]
struct SeedMessage {
    role: MessageRole,
    content: MessageContent,
}

impl From<SeedMessage> for Message {
    fn from(seed: SeedMessage) -> Self {
        Message::new(seed.role, seed.content)
    }
}

/// Session server client.
pub struct HttpSessionGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSessionGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Use an existing client (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

impl SessionGateway for HttpSessionGateway {
    async fn list_sessions(&self) -> Result<Vec<Session>, GatewayError> {
        let response = self
            .client
            .get(self.url("/session/all"))
            .send()
            .await
            .map_err(transport_error)?;
        let sessions: Vec<Session> = decode_json(ensure_success(response).await?).await?;
        debug!(count = sessions.len(), "Fetched sessions");
        Ok(sessions)
    }

    async fn add_session(&self, session: &Session) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url("/session/add"))
            .json(session)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_session(&self, session_id: &SessionId) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url("/session/delete"))
            .query(&[("sessionId", session_id.as_str())])
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn add_message(&self, session_id: &SessionId, message: &Message) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url("/session/message/add"))
            .query(&[("sessionId", session_id.as_str())])
            .json(message)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn mask_context(&self, mask_id: &MaskId) -> Result<Vec<Message>, GatewayError> {
        let response = self
            .client
            .get(self.url("/session/mask/context"))
            .query(&[("maskId", mask_id.as_str())])
            .send()
            .await
            .map_err(transport_error)?;
        let seeds: Vec<SeedMessage> = decode_json(ensure_success(response).await?).await?;
        debug!(mask_id = %mask_id, count = seeds.len(), "Fetched mask context");
        Ok(seeds.into_iter().map(Message::from).collect())
    }
}
