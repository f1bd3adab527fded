pub mod entry;
pub mod settings;
pub mod storage;
pub mod sync;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::database::RecordStore;
use crate::models::Settings;
use crate::services::{Catalog, CloudGateway, RemoteStore, StatusIndicator, SyncEngine};
use crate::utils::config;

/// Everything a command needs: the local catalog, the sync engine and the
/// status indicator, all sharing one record store.
pub struct AppContext<R = CloudGateway> {
    pub data_dir: PathBuf,
    pub settings: Settings,
    pub catalog: Catalog,
    pub engine: SyncEngine<R>,
    pub status: StatusIndicator,
}

impl AppContext<CloudGateway> {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let settings = config::read_settings(data_dir)?;
        let db_path = config::database_path(data_dir);
        let store = RecordStore::open(&db_path)
            .with_context(|| format!("failed to open database {}", db_path.display()))?;
        let remote = CloudGateway::from_settings(&settings.remote);
        Ok(Self::with_remote(data_dir, settings, store, remote))
    }
}

impl<R: RemoteStore> AppContext<R> {
    pub fn with_remote(data_dir: &Path, settings: Settings, store: RecordStore, remote: R) -> Self {
        let store = Arc::new(store);
        let status = StatusIndicator::new(Duration::from_secs(settings.sync.status_display_secs));
        Self {
            data_dir: data_dir.to_path_buf(),
            catalog: Catalog::new(Arc::clone(&store)),
            engine: SyncEngine::new(store, remote),
            status,
            settings,
        }
    }
}
