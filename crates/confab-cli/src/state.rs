//! Application state wiring the store to its concrete gateways.
//!
//! AppState holds the session store and the snapshot file used by every CLI
//! command. The store is generic over its gateways; AppState pins them to the
//! reqwest implementations from confab-infra.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;
use tracing::{info, warn};

use confab_core::SessionStore;
use confab_core::snapshot::{SnapshotStore, restore_state};
use confab_infra::config::{API_KEY_ENV, load_api_key, load_config};
use confab_infra::filesystem::resolve_data_dir;
use confab_infra::http::{HttpCompletionGateway, HttpSessionGateway};
use confab_infra::snapshot::FileSnapshotStore;
use confab_types::config::ClientConfig;
use confab_types::state::StoreState;

/// Concrete store type pinned to the HTTP gateways.
pub type ConfabStore = SessionStore<HttpSessionGateway, HttpCompletionGateway>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfabStore>,
    pub snapshots: Arc<FileSnapshotStore>,
    pub config: ClientConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory, load config, restore the last snapshot and
    /// wire the gateways.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let api_key = load_api_key().unwrap_or_else(|| {
            warn!("{API_KEY_ENV} is not set, completion requests will be rejected");
            SecretString::from(String::new())
        });

        let snapshots = FileSnapshotStore::in_data_dir(&data_dir, &config.snapshot_name);
        let initial = restore_state(&snapshots).await;
        info!(
            sessions = initial.sessions.len(),
            session_server = %config.session_server_url,
            "Store state restored"
        );

        Ok(Self::wire(config, data_dir, api_key, snapshots, initial))
    }

    /// Build the HTTP gateways, sharing one client, around `initial`.
    fn wire(
        config: ClientConfig,
        data_dir: PathBuf,
        api_key: SecretString,
        snapshots: FileSnapshotStore,
        initial: StoreState,
    ) -> Self {
        let client = reqwest::Client::new();
        let sessions = HttpSessionGateway::with_client(client.clone(), &config.session_server_url);
        let completion =
            HttpCompletionGateway::with_client(client, &config.completion_base_url, api_key);
        let store = SessionStore::with_state(sessions, completion, config.model.clone(), initial);

        Self {
            store: Arc::new(store),
            snapshots: Arc::new(snapshots),
            config,
            data_dir,
        }
    }

    /// Refresh the session list from the server.
    ///
    /// On failure the command runs on the restored snapshot instead.
    pub async fn sync(&self) {
        if let Err(e) = self.store.load_sessions().await {
            warn!(
                error = %e,
                session_server = %self.config.session_server_url,
                "Session refresh failed, using local snapshot"
            );
        }
    }

    /// Write the store's current state to the snapshot file.
    pub async fn persist(&self) {
        let state = self.store.snapshot().await;
        if let Err(e) = self.snapshots.save(&state).await {
            warn!(
                error = %e,
                data_dir = %self.data_dir.display(),
                "Failed to save store snapshot"
            );
        }
    }
}
