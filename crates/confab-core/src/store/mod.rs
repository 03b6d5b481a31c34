//! The session store: owner of the local session collection.
//!
//! `SessionStore` holds the ordered session list and the current-session
//! pointer, and mediates every change to them through the two remote
//! gateways under a confirm-then-apply discipline: a session, deletion, or
//! message only reaches local state after the session server has accepted it.
//!
//! Operations are independent async units of work. The state lock is held
//! only while applying a confirmed result, never across a network call, so a
//! stalled request does not block other operations. Overlapping operations
//! are not serialized against each other.

mod chat;

#[cfg(test)]
pub(crate) mod testing;

use chrono::Utc;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use confab_types::chat::Session;
use confab_types::error::{GatewayError, StoreError};
use confab_types::event::StoreEvent;
use confab_types::id::SessionId;
use confab_types::mask::Mask;
use confab_types::message::Message;
use confab_types::state::{StoreState, index_after_removal};

use crate::event::EventBus;
use crate::gateway::{CompletionGateway, SessionGateway};

pub(crate) const OP_LOAD_SESSIONS: &str = "load sessions";
pub(crate) const OP_FETCH_MASK_CONTEXT: &str = "fetch mask context";
pub(crate) const OP_CREATE_SESSION: &str = "create session";
pub(crate) const OP_DELETE_SESSION: &str = "delete session";
pub(crate) const OP_UPLOAD_USER_MESSAGE: &str = "upload user message";
pub(crate) const OP_COMPLETION: &str = "completion";
pub(crate) const OP_UPLOAD_ASSISTANT_MESSAGE: &str = "upload assistant message";

/// Owned state container for the client's sessions.
///
/// Generic over both gateways so confab-core never depends on confab-infra.
/// Share it behind an `Arc` when several tasks need it.
pub struct SessionStore<S: SessionGateway, C: CompletionGateway> {
    session_gateway: S,
    completion_gateway: C,
    model: String,
    state: RwLock<StoreState>,
    events: EventBus,
}

impl<S: SessionGateway, C: CompletionGateway> SessionStore<S, C> {
    /// Create a store holding one empty, selected session.
    pub fn new(session_gateway: S, completion_gateway: C, model: impl Into<String>) -> Self {
        Self::with_state(session_gateway, completion_gateway, model, StoreState::new())
    }

    /// Create a store from a previously saved state.
    ///
    /// The state is normalized first so the non-empty and valid-index
    /// invariants hold from the very first read.
    pub fn with_state(
        session_gateway: S,
        completion_gateway: C,
        model: impl Into<String>,
        state: StoreState,
    ) -> Self {
        Self {
            session_gateway,
            completion_gateway,
            model: model.into(),
            state: RwLock::new(state.normalized()),
            events: EventBus::default(),
        }
    }

    /// Model identifier sent with every completion request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Subscribe to store events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // --- Reads ---

    /// The session at the current index, clamped into bounds.
    ///
    /// This is the read path for "the current session"; it tolerates an
    /// index that is transiently out of range.
    pub async fn current_session(&self) -> Session {
        let state = self.state.read().await;
        // The session list is never empty, so the clamped index is valid.
        state.sessions[state.clamped_index()].clone()
    }

    /// The current index, clamped into bounds.
    pub async fn current_index(&self) -> usize {
        self.state.read().await.clamped_index()
    }

    pub async fn session_count(&self) -> usize {
        self.state.read().await.sessions.len()
    }

    /// All sessions in store order.
    pub async fn sessions(&self) -> Vec<Session> {
        self.state.read().await.sessions.clone()
    }

    /// Display view: `(store index, session)` pairs, most recently updated first.
    pub async fn sessions_by_recency(&self) -> Vec<(usize, Session)> {
        let state = self.state.read().await;
        let mut view: Vec<(usize, Session)> = state.sessions.iter().cloned().enumerate().collect();
        view.sort_by(|(_, a), (_, b)| b.last_update.cmp(&a.last_update));
        view
    }

    /// A copy of the full state, suitable for persisting.
    pub async fn snapshot(&self) -> StoreState {
        self.state.read().await.clone()
    }

    // --- Local mutations ---

    /// Point the store at the session at `index`.
    ///
    /// Out-of-range indices are clamped to the last session.
    pub async fn select_session(&self, index: usize) {
        let selected = {
            let mut state = self.state.write().await;
            state.current_session_index = index;
            state.current_session_index = state.clamped_index();
            state.current_session_index
        };
        debug!(requested = index, selected, "Session selected");
        self.events.publish(StoreEvent::SessionSelected { index: selected });
    }

    /// Replace the current session with `transform(current)`.
    ///
    /// The result's messages are re-sorted chronologically and its
    /// `last_update` is never allowed to move backwards. Purely local: callers
    /// that need persistence must go through the session gateway themselves.
    pub async fn update_current_session<F>(&self, transform: F) -> Session
    where
        F: FnOnce(Session) -> Session,
    {
        let mut state = self.state.write().await;
        let index = state.clamped_index();
        state.current_session_index = index;
        let updated = apply_transform(&state.sessions[index], transform);
        state.sessions[index] = updated.clone();
        updated
    }

    /// Replace the session identified by `session_id` with `transform(session)`.
    ///
    /// Same guarantees as [`Self::update_current_session`], but targets a
    /// session by identity so a selection change in the meantime cannot
    /// redirect the update.
    pub(crate) async fn update_session<F>(
        &self,
        session_id: &SessionId,
        transform: F,
    ) -> Result<Session, StoreError>
    where
        F: FnOnce(Session) -> Session,
    {
        let mut state = self.state.write().await;
        let Some(position) = state.position_of(session_id) else {
            return Err(StoreError::SessionVanished(session_id.clone()));
        };
        let updated = apply_transform(&state.sessions[position], transform);
        state.sessions[position] = updated.clone();
        Ok(updated)
    }

    // --- Remote-confirmed mutations ---

    /// Replace the local session list with the server's.
    ///
    /// The server list is sorted by `last_update` descending. The selection
    /// follows the previously selected session by identity, falling back to
    /// index 0. An empty server list leaves local state as it is, since
    /// adopting it would leave the store without a session.
    pub async fn load_sessions(&self) -> Result<(), StoreError> {
        let mut sessions = self
            .session_gateway
            .list_sessions()
            .await
            .map_err(|e| self.fail(OP_LOAD_SESSIONS, e))?;

        if sessions.is_empty() {
            debug!("Session server returned no sessions, keeping local state");
            return Ok(());
        }

        sessions.sort_by(|a, b| b.last_update.cmp(&a.last_update));
        for session in &mut sessions {
            session.sort_messages();
        }

        let (count, current_index) = {
            let mut state = self.state.write().await;
            let selected_id = state.current().map(|s| s.id.clone());
            let current_index = selected_id
                .and_then(|id| sessions.iter().position(|s| s.id == id))
                .unwrap_or(0);
            let count = sessions.len();
            *state = StoreState {
                sessions,
                current_session_index: current_index,
            };
            (count, current_index)
        };

        info!(count, current_index, "Sessions loaded from server");
        self.events.publish(StoreEvent::SessionsLoaded {
            count,
            current_index,
        });
        Ok(())
    }

    /// Create a session, optionally from a mask, and select it.
    ///
    /// With a mask, the topic and mask reference come from it and the seed
    /// messages are fetched from the server, re-stamped with one shared
    /// instant and numbered to keep their original order. The session is
    /// persisted remotely before it is inserted locally at index 0.
    pub async fn new_session(&self, mask: Option<Mask>) -> Result<SessionId, StoreError> {
        let session = match mask {
            Some(mask) => {
                let context = self
                    .session_gateway
                    .mask_context(&mask.id)
                    .await
                    .map_err(|e| self.fail(OP_FETCH_MASK_CONTEXT, e))?;
                let mut session = Session::from_mask(mask);
                session.messages = seed_messages(context);
                session
            }
            None => Session::empty(),
        };

        self.session_gateway
            .add_session(&session)
            .await
            .map_err(|e| self.fail(OP_CREATE_SESSION, e))?;

        let session_id = session.id.clone();
        let seeded = session.messages.len();
        {
            let mut state = self.state.write().await;
            state.sessions.insert(0, session);
            state.current_session_index = 0;
        }

        info!(session_id = %session_id, seeded, "Session created");
        self.events.publish(StoreEvent::SessionCreated {
            session_id: session_id.clone(),
        });
        Ok(session_id)
    }

    /// Delete the session at `index` once the server confirms it.
    ///
    /// The selection shifts down when an earlier session is removed, stays
    /// (clamped) when the selected one is removed, and is untouched
    /// otherwise. Removing the last session synthesizes a fresh empty one.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoSuchSession`] if nothing is at `index`; local state is
    /// left unchanged on every error.
    pub async fn delete_session(&self, index: usize) -> Result<SessionId, StoreError> {
        let target = {
            let state = self.state.read().await;
            state.sessions.get(index).map(|s| s.id.clone())
        };
        let Some(session_id) = target else {
            debug!(index, "No session at index, nothing to delete");
            return Err(StoreError::NoSuchSession(index));
        };

        self.session_gateway
            .delete_session(&session_id)
            .await
            .map_err(|e| self.fail(OP_DELETE_SESSION, e))?;

        let (current_index, replaced_with_empty) = {
            let mut state = self.state.write().await;
            // Locate by identity: a reload may have moved it since the call began.
            let Some(position) = state.position_of(&session_id) else {
                debug!(session_id = %session_id, "Deleted session already gone locally");
                return Ok(session_id);
            };

            let current = state.current_session_index;
            state.sessions.remove(position);

            if state.sessions.is_empty() {
                state.sessions.push(Session::empty());
                state.current_session_index = 0;
                (0, true)
            } else {
                let next = index_after_removal(current, position, state.sessions.len());
                state.current_session_index = next;
                (next, false)
            }
        };

        info!(session_id = %session_id, current_index, replaced_with_empty, "Session deleted");
        self.events.publish(StoreEvent::SessionDeleted {
            session_id: session_id.clone(),
            current_index,
            replaced_with_empty,
        });
        Ok(session_id)
    }

    // --- Failure reporting ---

    /// Log a failed remote operation, publish it, and wrap it as a store error.
    pub(crate) fn fail(&self, operation: &'static str, error: GatewayError) -> StoreError {
        warn!(operation, error = %error, "Remote operation failed, local state unchanged");
        self.events.publish(StoreEvent::OperationFailed {
            operation: operation.to_string(),
            error: error.to_string(),
        });
        StoreError::gateway(operation, error)
    }
}

/// Apply a session transform and re-establish the ordering invariants.
fn apply_transform<F>(current: &Session, transform: F) -> Session
where
    F: FnOnce(Session) -> Session,
{
    let previous_update = current.last_update;
    let mut updated = transform(current.clone());
    updated.sort_messages();
    updated.touch(previous_update);
    updated
}

/// Re-stamp mask seed messages with one shared instant, numbered in order.
fn seed_messages(context: Vec<Message>) -> Vec<Message> {
    let now = Utc::now();
    context
        .into_iter()
        .enumerate()
        .map(|(i, message)| message.restamped(now, u32::try_from(i).unwrap_or(u32::MAX)))
        .collect()
}
