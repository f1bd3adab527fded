use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::AppContext;
use crate::models::{CatalogEntry, EntryFilter};
use crate::services::RemoteStore;
use crate::utils::parse_tags;

/// Field edits from the entry form. `None` leaves a field unchanged; an
/// empty string clears an optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
    /// Raw tag input, split by `parse_tags`.
    pub tags: Option<String>,
    pub negative_body: Option<String>,
    pub primary_media_ref: Option<String>,
    pub secondary_media_ref: Option<String>,
    pub is_video: Option<bool>,
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl EntryPatch {
    fn apply(self, entry: &mut CatalogEntry) {
        if let Some(title) = self.title {
            entry.title = title.trim().to_string();
        }
        if let Some(body) = self.body {
            entry.body = body;
        }
        if let Some(category) = self.category {
            entry.category = category.trim().to_string();
        }
        if let Some(tags) = self.tags {
            entry.tags = parse_tags(&tags);
        }
        if let Some(negative) = self.negative_body {
            entry.negative_body = optional(negative);
        }
        if let Some(media) = self.primary_media_ref {
            entry.primary_media_ref = optional(media);
        }
        if let Some(media) = self.secondary_media_ref {
            entry.secondary_media_ref = optional(media);
        }
        if let Some(is_video) = self.is_video {
            entry.is_video_hint = Some(is_video);
        }
    }
}

/// Form-level rule on top of `Catalog::save`: every category except
/// `general` shows a reference image, so it needs an output media ref.
fn check_form(entry: &CatalogEntry) -> Result<()> {
    if entry.category != "general" && entry.primary_media_ref.is_none() {
        bail!("category '{}' needs an output media reference (--media)", entry.category);
    }
    Ok(())
}

pub fn get_entries<R: RemoteStore>(
    ctx: &AppContext<R>,
    category: Option<String>,
    search: Option<String>,
) -> Result<Vec<CatalogEntry>> {
    let filter = EntryFilter {
        category,
        query: search,
    };
    Ok(ctx.catalog.filter(&filter)?)
}

pub fn get_entry<R: RemoteStore>(ctx: &AppContext<R>, id: &str) -> Result<CatalogEntry> {
    Ok(ctx.catalog.get(id)?)
}

pub fn create_entry<R: RemoteStore>(
    ctx: &AppContext<R>,
    title: String,
    body: String,
    category: String,
    patch: EntryPatch,
) -> Result<CatalogEntry> {
    let mut entry = CatalogEntry::new(title.trim(), body, category.trim());
    patch.apply(&mut entry);
    check_form(&entry)?;
    ctx.catalog.save(&entry)?;
    Ok(ctx.catalog.get(&entry.id)?)
}

pub fn update_entry<R: RemoteStore>(ctx: &AppContext<R>, id: &str, patch: EntryPatch) -> Result<CatalogEntry> {
    let mut entry = ctx.catalog.get(id)?;
    patch.apply(&mut entry);
    check_form(&entry)?;
    ctx.catalog.save(&entry)?;
    Ok(ctx.catalog.get(id)?)
}

pub fn delete_entry<R: RemoteStore>(ctx: &AppContext<R>, id: &str) -> Result<()> {
    ctx.catalog.remove(id)?;
    Ok(())
}
