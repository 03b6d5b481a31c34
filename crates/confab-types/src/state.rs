//! The session store's serializable state.
//!
//! [`StoreState`] is both the in-memory shape the store guards and the
//! snapshot the host persists between runs. Its invariants: the session list
//! is never empty, and the current index always points into it.

use serde::{Deserialize, Serialize};

use crate::chat::Session;
use crate::id::SessionId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub sessions: Vec<Session>,
    pub current_session_index: usize,
}

impl StoreState {
    /// A state holding one empty session, selected.
    pub fn new() -> Self {
        Self {
            sessions: vec![Session::empty()],
            current_session_index: 0,
        }
    }

    /// Restore the invariants on a state of unknown provenance (e.g. a snapshot).
    pub fn normalized(mut self) -> Self {
        if self.sessions.is_empty() {
            self.sessions.push(Session::empty());
        }
        self.current_session_index = clamp_index(self.current_session_index, self.sessions.len());
        self
    }

    /// The current index clamped into `[0, len - 1]`.
    pub fn clamped_index(&self) -> usize {
        clamp_index(self.current_session_index, self.sessions.len())
    }

    /// The session at the clamped current index.
    pub fn current(&self) -> Option<&Session> {
        self.sessions.get(self.clamped_index())
    }

    pub fn position_of(&self, id: &SessionId) -> Option<usize> {
        self.sessions.iter().position(|s| &s.id == id)
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp `index` into `[0, len - 1]`; an empty collection clamps to 0.
pub fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Current index after removing the session at `removed` from a list that
/// now has `new_len` entries.
///
/// - removed before current: shift down by one
/// - removed the current one: stay, clamped to the new last index
/// - removed after current: unchanged
pub fn index_after_removal(current: usize, removed: usize, new_len: usize) -> usize {
    let next = if removed < current {
        current - 1
    } else if removed == current {
        current.min(new_len.saturating_sub(1))
    } else {
        current
    };
    if next >= new_len { 0 } else { next }
}
