//! One-directional reconciliation between the local store and the remote table.
//!
//! Push sends dirty entries and queued tombstones; pull replaces the local
//! store with the remote snapshot. Neither retries: a failed call is simply
//! invoked again, and the dirty flags and tombstone queue make that safe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::database::RecordStore;
use crate::error::{SyncError, SyncStep};
use crate::models::{CatalogEntry, PushReport, RemoteRow};
use crate::services::remote::RemoteStore;

/// Clears the in-flight flag when a sync ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SyncEngine<R> {
    store: Arc<RecordStore>,
    remote: R,
    in_flight: AtomicBool,
}

impl<R: RemoteStore> SyncEngine<R> {
    pub fn new(store: Arc<RecordStore>, remote: R) -> Self {
        Self {
            store,
            remote,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn is_connected(&self) -> bool {
        self.remote.is_connected()
    }

    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Single-flight: a second sync while one is running is rejected.
    fn begin(&self) -> Result<InFlight<'_>, SyncError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SyncError::InProgress)?;
        let guard = InFlight(&self.in_flight);

        if !self.remote.is_connected() {
            return Err(SyncError::Configuration("no remote url/key set".to_string()));
        }
        Ok(guard)
    }

    /// Check that the remote answers.
    pub async fn test_connection(&self) -> Result<(), SyncError> {
        if !self.remote.is_connected() {
            return Err(SyncError::Configuration("no remote url/key set".to_string()));
        }
        self.remote
            .ping()
            .await
            .map_err(|e| SyncError::remote(SyncStep::Fetch, e))
    }

    /// Push local changes: queued deletes first, then dirty entries.
    ///
    /// A failed delete aborts before any upload. A delete that succeeded stays
    /// committed even if the upload then fails.
    pub async fn push(&self) -> Result<PushReport, SyncError> {
        let _guard = self.begin()?;

        let to_upload: Vec<CatalogEntry> = self
            .store
            .get_all()?
            .into_iter()
            .filter(|e| e.dirty)
            .collect();
        let ids_to_delete: Vec<String> = self
            .store
            .tombstones()
            .list()?
            .into_iter()
            .map(|t| t.id)
            .collect();

        if to_upload.is_empty() && ids_to_delete.is_empty() {
            log::debug!("Push skipped: no local changes");
            return Ok(PushReport::unchanged());
        }

        let mut report = PushReport::default();

        if !ids_to_delete.is_empty() {
            log::info!("Deleting {} entries from remote", ids_to_delete.len());
            if let Err(e) = self.remote.bulk_delete(&ids_to_delete).await {
                log::warn!("Remote delete failed, upload not attempted: {}", e);
                return Err(SyncError::remote(SyncStep::Delete, e));
            }
            self.store.tombstones().remove(&ids_to_delete)?;
            report.deleted = ids_to_delete.len();
        }

        if !to_upload.is_empty() {
            log::info!("Uploading {} entries to remote", to_upload.len());
            let rows: Vec<RemoteRow> = to_upload.iter().map(RemoteRow::from).collect();
            if let Err(e) = self.remote.bulk_upsert(&rows).await {
                log::warn!("Remote upload failed: {}", e);
                return Err(SyncError::remote(SyncStep::Upload, e));
            }
            self.store.mark_clean(&to_upload)?;
            report.uploaded = to_upload.len();
        }

        log::info!(
            "Push finished: {} uploaded, {} deleted",
            report.uploaded,
            report.deleted
        );
        Ok(report)
    }

    /// Replace the local store with the remote snapshot.
    ///
    /// The fetch happens before anything local is touched, so a network
    /// failure leaves local data as it was.
    pub async fn pull(&self) -> Result<usize, SyncError> {
        let _guard = self.begin()?;

        log::info!("Fetching remote snapshot");
        let rows = match self.remote.fetch_all().await {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("Remote fetch failed, local data untouched: {}", e);
                return Err(SyncError::remote(SyncStep::Fetch, e));
            }
        };

        let entries: Vec<CatalogEntry> = rows.into_iter().map(RemoteRow::into_entry).collect();
        self.store.replace_all(&entries)?;

        log::info!("Pull finished: {} entries restored", entries.len());
        Ok(entries.len())
    }
}
