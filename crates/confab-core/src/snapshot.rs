//! Local persistence of the store's state between runs.
//!
//! The snapshot is an implementation detail of the host: a fixed storage name
//! holding the last known session list and selection. It is never a source of
//! truth over the session server, only a warm start before the first reload.

use confab_types::error::SnapshotError;
use confab_types::state::StoreState;
use tracing::{debug, warn};

/// Storage for [`StoreState`] snapshots.
///
/// Implementations live in confab-infra (e.g., `FileSnapshotStore`).
pub trait SnapshotStore: Send + Sync {
    /// Read the last saved state, or `None` if nothing has been saved yet.
    fn load(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<StoreState>, SnapshotError>> + Send;

    fn save(
        &self,
        state: &StoreState,
    ) -> impl std::future::Future<Output = Result<(), SnapshotError>> + Send;
}

/// Load the initial store state from a snapshot.
///
/// - No snapshot yet: a fresh state with one empty session.
/// - Unreadable snapshot: logs a warning and starts fresh.
/// - Otherwise the saved state, normalized so its invariants hold.
pub async fn restore_state<S: SnapshotStore>(snapshots: &S) -> StoreState {
    match snapshots.load().await {
        Ok(Some(state)) => state.normalized(),
        Ok(None) => {
            debug!("No store snapshot found, starting with an empty session");
            StoreState::new()
        }
        Err(err) => {
            warn!(error = %err, "Failed to restore store snapshot, starting fresh");
            StoreState::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_types::chat::Session;

    struct FixedSnapshot(Result<Option<StoreState>, ()>);

    impl SnapshotStore for FixedSnapshot {
        async fn load(&self) -> Result<Option<StoreState>, SnapshotError> {
            self.0
                .clone()
                .map_err(|()| SnapshotError::Format("truncated".to_string()))
        }

        async fn save(&self, _state: &StoreState) -> Result<(), SnapshotError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn restore_without_snapshot_starts_fresh() {
        let state = restore_state(&FixedSnapshot(Ok(None))).await;
        assert_eq!(state.sessions.len(), 1);
        assert_eq!(state.current_session_index, 0);
    }

    #[tokio::test]
    async fn restore_from_broken_snapshot_starts_fresh() {
        let state = restore_state(&FixedSnapshot(Err(()))).await;
        assert_eq!(state.sessions.len(), 1);
    }

    #[tokio::test]
    async fn restore_normalizes_saved_state() {
        let saved = StoreState {
            sessions: vec![Session::empty(), Session::empty()],
            current_session_index: 5,
        };
        let state = restore_state(&FixedSnapshot(Ok(Some(saved)))).await;
        assert_eq!(state.current_session_index, 1);
    }
}
