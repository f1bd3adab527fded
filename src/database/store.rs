//! Local record store and tombstone queue.
//!
//! Every multi-row mutation runs inside one SQLite transaction, so a failure
//! leaves both tables as they were before the call.

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

use super::queries;
use crate::error::StorageError;
use crate::models::{CatalogEntry, StorageStats, Tombstone};

pub struct RecordStore {
    conn: Mutex<Connection>,
}

impl RecordStore {
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        Ok(Self::from_connection(super::init_database(db_path)?))
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Ok(Self::from_connection(super::init_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Every live entry, in no particular order.
    pub fn get_all(&self) -> Result<Vec<CatalogEntry>, StorageError> {
        queries::get_all_entries(&self.conn.lock())
    }

    pub fn get(&self, id: &str) -> Result<Option<CatalogEntry>, StorageError> {
        queries::get_entry(&self.conn.lock(), id)
    }

    /// Insert or replace by id, marking the entry dirty and dropping any
    /// pending tombstone for it in the same transaction.
    pub fn upsert(&self, entry: &CatalogEntry) -> Result<(), StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        queries::delete_tombstone(&tx, &entry.id)?;
        queries::write_entry(&tx, entry, true)?;
        tx.commit()?;
        Ok(())
    }

    /// Remove the live entry (if any) and queue a tombstone for it.
    ///
    /// Returns whether a live entry existed.
    pub fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let removed = queries::delete_entry(&tx, id)?;
        queries::put_tombstone(&tx, id, Utc::now())?;
        tx.commit()?;
        Ok(removed > 0)
    }

    /// Clear the dirty flag of each entry whose stored row still equals the
    /// given copy.
    ///
    /// Entries deleted locally since they were read are skipped so that a
    /// confirmed upload never resurrects a tombstoned id. Entries edited since
    /// they were read stay dirty for the next push.
    pub fn mark_clean(&self, entries: &[CatalogEntry]) -> Result<usize, StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut written = 0;
        for entry in entries {
            if queries::has_tombstone(&tx, &entry.id)? {
                log::debug!("Skipping mark_clean for {}: deleted locally", entry.id);
                continue;
            }
            let Some(mut current) = queries::get_entry(&tx, &entry.id)? else {
                log::debug!("Skipping mark_clean for {}: no live entry", entry.id);
                continue;
            };
            current.dirty = entry.dirty;
            if current != *entry {
                log::debug!("Skipping mark_clean for {}: edited during upload", entry.id);
                continue;
            }
            queries::set_clean(&tx, &entry.id)?;
            written += 1;
        }
        tx.commit()?;
        Ok(written)
    }

    /// Empty both the live table and the tombstone queue.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        clear_tables(&tx)?;
        tx.commit()?;
        Ok(())
    }

    /// Full replace: afterwards the store holds exactly `entries`, all clean,
    /// and the tombstone queue is empty.
    pub fn replace_all(&self, entries: &[CatalogEntry]) -> Result<(), StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        clear_tables(&tx)?;
        for entry in entries {
            queries::write_entry(&tx, entry, false)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn tombstones(&self) -> TombstoneQueue<'_> {
        TombstoneQueue { store: self }
    }

    pub fn stats(&self) -> Result<StorageStats, StorageError> {
        let conn = self.conn.lock();
        let entries = queries::get_all_entries(&conn)?;

        let total_size_bytes = entries
            .iter()
            .map(|e| serde_json::to_string(e).map(|s| s.len() as i64).unwrap_or(0))
            .sum();

        Ok(StorageStats {
            entries_count: entries.len() as i64,
            dirty_count: queries::count_entries(&conn, true)?,
            pending_deletes: queries::count_tombstones(&conn)?,
            total_size_bytes,
        })
    }
}

fn clear_tables(conn: &Connection) -> Result<(), StorageError> {
    let entries = queries::clear_entries(conn)?;
    let tombstones = queries::clear_tombstones(conn)?;
    log::debug!("Cleared {} entries and {} tombstones", entries, tombstones);
    Ok(())
}

/// View over the durable delete queue.
pub struct TombstoneQueue<'a> {
    store: &'a RecordStore,
}

impl TombstoneQueue<'_> {
    pub fn list(&self) -> Result<Vec<Tombstone>, StorageError> {
        queries::get_tombstones(&self.store.conn.lock())
    }

    /// Drop the given ids. Only call after the remote delete was acknowledged.
    pub fn remove(&self, ids: &[String]) -> Result<(), StorageError> {
        let mut conn = self.store.conn.lock();
        let tx = conn.transaction()?;
        for id in ids {
            queries::delete_tombstone(&tx, id)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn contains(&self, id: &str) -> Result<bool, StorageError> {
        queries::has_tombstone(&self.store.conn.lock(), id)
    }
}
