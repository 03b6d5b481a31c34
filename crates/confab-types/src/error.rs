use thiserror::Error;

use crate::chat::ChatPhase;
use crate::id::SessionId;

/// Errors from the remote session and completion services.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The request never produced a response (connect, DNS, IO).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    /// The response body could not be decoded or lacked the expected fields.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors from session store operations.
///
/// Every variant leaves the store's local state exactly as it was before the
/// failing call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{operation} failed: {source}")]
    Gateway {
        operation: &'static str,
        source: GatewayError,
    },

    #[error("no session at index {0}")]
    NoSuchSession(usize),

    /// The target session was removed locally before a confirmed result could be applied.
    #[error("session {0} is no longer present")]
    SessionVanished(SessionId),
}

impl StoreError {
    pub fn gateway(operation: &'static str, source: GatewayError) -> Self {
        StoreError::Gateway { operation, source }
    }
}

/// A chat exchange that stopped before the assistant reply was committed.
#[derive(Debug, Error)]
#[error("chat stopped after {phase}: {source}")]
pub struct ChatError {
    /// Last phase reached before the failure.
    pub phase: ChatPhase,
    pub source: StoreError,
}

/// Errors reading or writing the local store snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(String),

    #[error("snapshot format error: {0}")]
    Format(String),
}
