use anyhow::{Context, Result};

use super::AppContext;
use crate::models::{PushReport, SyncStatus};
use crate::services::RemoteStore;

pub async fn push_to_cloud<R: RemoteStore>(ctx: &AppContext<R>) -> Result<PushReport> {
    ctx.status.set(SyncStatus::Uploading);

    match ctx.engine.push().await {
        Ok(report) => {
            let message = report.message.clone().unwrap_or_else(|| {
                format!(
                    "sync succeeded: {} uploaded, {} deleted",
                    report.uploaded, report.deleted
                )
            });
            ctx.status.set(SyncStatus::Succeeded(message));
            Ok(report)
        }
        Err(e) => {
            log::error!("Push failed: {}", e);
            ctx.status.set(SyncStatus::Failed("sync failed".to_string()));
            Err(e).context("sync to cloud failed")
        }
    }
}

pub async fn restore_from_cloud<R: RemoteStore>(ctx: &AppContext<R>) -> Result<usize> {
    ctx.status.set(SyncStatus::Downloading);

    match ctx.engine.pull().await {
        Ok(count) => {
            ctx.status
                .set(SyncStatus::Succeeded(format!("restored {} entries", count)));
            Ok(count)
        }
        Err(e) => {
            log::error!("Pull failed: {}", e);
            ctx.status.set(SyncStatus::Failed("restore failed".to_string()));
            Err(e).context("restore from cloud failed")
        }
    }
}

pub async fn test_connection<R: RemoteStore>(ctx: &AppContext<R>) -> Result<()> {
    ctx.engine
        .test_connection()
        .await
        .context("cloud connection test failed")
}
