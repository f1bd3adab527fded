use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::CatalogEntry;

/// A row of the remote `prompts` table.
///
/// Absent optionals are omitted from the payload rather than sent as `null`.
/// `user_id` is owned by the remote store: it is read on pull and never written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRow {
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_video: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub user_id: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<&CatalogEntry> for RemoteRow {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            prompt: entry.body.clone(),
            category: entry.category.clone(),
            tags: entry.tags.clone(),
            negative_prompt: entry.negative_body.clone(),
            output_media_url: entry.primary_media_ref.clone(),
            input_media_url: entry.secondary_media_ref.clone(),
            is_video: entry.is_video_hint,
            created_at: Some(entry.created_at),
            user_id: None,
        }
    }
}

impl RemoteRow {
    /// Local shape of a pulled row. Pulled entries are clean by definition.
    pub fn into_entry(self) -> CatalogEntry {
        let created_at = self.created_at.unwrap_or_else(|| {
            log::warn!("Remote row {} has no created_at, using now", self.id);
            Utc::now()
        });

        CatalogEntry {
            id: self.id,
            title: self.title,
            body: self.prompt,
            category: self.category,
            tags: self.tags,
            negative_body: self.negative_prompt,
            primary_media_ref: self.output_media_url,
            secondary_media_ref: self.input_media_url,
            is_video_hint: self.is_video,
            created_at,
            owner_ref: self.user_id,
            dirty: false,
        }
    }
}
