//! SessionGateway trait definition.
//!
//! Follows the same RPITIT pattern as the other ports: native async fn in
//! traits (Rust 2024 edition), `Send` futures so the store can be shared
//! across tasks.

use confab_types::chat::Session;
use confab_types::error::GatewayError;
use confab_types::id::{MaskId, SessionId};
use confab_types::message::Message;

/// Client for the remote session persistence service.
///
/// Implementations live in confab-infra (e.g., `HttpSessionGateway`).
pub trait SessionGateway: Send + Sync {
    /// Fetch every session the server knows about, in no particular order.
    fn list_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Session>, GatewayError>> + Send;

    /// Persist a full session object.
    ///
    /// Not idempotent: repeated calls may create duplicates server-side.
    fn add_session(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;

    fn delete_session(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;

    /// Append one message to a persisted session.
    fn add_message(
        &self,
        session_id: &SessionId,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;

    /// Fetch the seed messages of a mask, in their intended order.
    fn mask_context(
        &self,
        mask_id: &MaskId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, GatewayError>> + Send;
}
