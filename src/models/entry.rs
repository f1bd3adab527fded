use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One catalog record: a prompt plus its metadata and optional media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub body: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_body: Option<String>,
    /// Output media: a data URI or a URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_media_ref: Option<String>,
    /// Input/reference media for image-to-X categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_media_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_video_hint: Option<bool>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_ref: Option<String>,
    /// Changed locally since the last confirmed push. Never sent to the remote store.
    #[serde(default)]
    pub dirty: bool,
}

impl CatalogEntry {
    /// A fresh, unsaved entry with a new id and `created_at = now`.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
            category: category.into(),
            tags: Vec::new(),
            negative_body: None,
            primary_media_ref: None,
            secondary_media_ref: None,
            is_video_hint: None,
            created_at: Utc::now(),
            owner_ref: None,
            dirty: true,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_primary_media(mut self, media: impl Into<String>) -> Self {
        self.primary_media_ref = Some(media.into());
        self
    }
}

/// Durable marker of a local deletion awaiting remote confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tombstone {
    pub id: String,
    pub deleted_at: DateTime<Utc>,
}

/// Search criteria for listing entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryFilter {
    pub category: Option<String>,
    pub query: Option<String>,
}

impl EntryFilter {
    /// Case-insensitive substring match on title, body, or any tag,
    /// restricted to `category` when set.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if let Some(category) = &self.category {
            if &entry.category != category {
                return false;
            }
        }

        let needle = match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return true,
        };

        entry.title.to_lowercase().contains(&needle)
            || entry.body.to_lowercase().contains(&needle)
            || entry.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}
