//! JSON file implementation of [`SnapshotStore`].
//!
//! The snapshot lives at `{data_dir}/{snapshot_name}.json` as pretty-printed
//! JSON. Writes go to a sibling temp file first and are renamed into place,
//! so a crash mid-write leaves the previous snapshot intact.

use std::path::{Path, PathBuf};

use confab_core::snapshot::SnapshotStore;
use confab_types::error::SnapshotError;
use confab_types::state::StoreState;

use crate::filesystem::snapshot_path;

pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot file named `{name}.json` inside `data_dir`.
    pub fn in_data_dir(data_dir: &Path, name: &str) -> Self {
        Self::new(snapshot_path(data_dir, name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileSnapshotStore {
    async fn load(&self) -> Result<Option<StoreState>, SnapshotError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(SnapshotError::Io(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )));
            }
        };

        let state = serde_json::from_str(&content).map_err(|e| {
            SnapshotError::Format(format!("failed to parse {}: {e}", self.path.display()))
        })?;
        Ok(Some(state))
    }

    async fn save(&self, state: &StoreState) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| SnapshotError::Format(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SnapshotError::Io(format!("failed to create {}: {e}", parent.display())))?;
        }

        let tmp_path = self.temp_path();
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|e| SnapshotError::Io(format!("failed to write {}: {e}", tmp_path.display())))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| SnapshotError::Io(format!("failed to replace {}: {e}", self.path.display())))?;

        tracing::debug!(
            path = %self.path.display(),
            sessions = state.sessions.len(),
            "Store snapshot saved"
        );
        Ok(())
    }
}
