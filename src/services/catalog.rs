use std::sync::Arc;

use crate::database::RecordStore;
use crate::error::CatalogError;
use crate::models::{CatalogEntry, EntryFilter, StorageStats};

/// Read/edit surface used by the presentation layer.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<RecordStore>,
}

impl Catalog {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// All live entries, newest first.
    pub fn load_all(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let mut entries = self.store.get_all()?;
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }

    pub fn filter(&self, filter: &EntryFilter) -> Result<Vec<CatalogEntry>, CatalogError> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect())
    }

    pub fn get(&self, id: &str) -> Result<CatalogEntry, CatalogError> {
        self.store
            .get(id)?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Create or update. The stored entry is marked dirty and any pending
    /// delete for its id is dropped; an existing `created_at` is kept.
    pub fn save(&self, entry: &CatalogEntry) -> Result<(), CatalogError> {
        validate(entry)?;
        self.store.upsert(entry)?;
        log::debug!("Saved entry {}", entry.id);
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<(), CatalogError> {
        if !self.store.delete(id)? {
            log::debug!("Removed {} which had no live entry", id);
        }
        Ok(())
    }

    pub fn stats(&self) -> Result<StorageStats, CatalogError> {
        Ok(self.store.stats()?)
    }
}

fn validate(entry: &CatalogEntry) -> Result<(), CatalogError> {
    if entry.id.trim().is_empty() {
        return Err(CatalogError::Validation("id must not be empty".to_string()));
    }
    if entry.title.trim().is_empty() || entry.body.trim().is_empty() {
        return Err(CatalogError::Validation(
            "title and prompt must not be empty".to_string(),
        ));
    }
    if entry.category.trim().is_empty() {
        return Err(CatalogError::Validation("category must not be empty".to_string()));
    }
    Ok(())
}
