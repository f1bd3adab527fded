use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppContext;
use crate::models::{StorageStats, SyncStatus};
use crate::services::RemoteStore;
use crate::utils::format_bytes;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageReport {
    #[serde(flatten)]
    pub stats: StorageStats,
    pub total_size: String,
    pub connected: bool,
    pub status: SyncStatus,
}

pub fn get_storage_stats<R: RemoteStore>(ctx: &AppContext<R>) -> Result<StorageReport> {
    let stats = ctx.catalog.stats()?;
    Ok(StorageReport {
        total_size: format_bytes(stats.total_size_bytes),
        stats,
        connected: ctx.engine.is_connected(),
        status: ctx.status.current(),
    })
}
