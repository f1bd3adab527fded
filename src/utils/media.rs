use regex::Regex;
use std::sync::OnceLock;

use crate::models::CatalogEntry;

fn video_extension() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\.(mp4|webm|ogg|mov|mkv)$").expect("valid video pattern"))
}

/// Best-effort guess from the media reference alone.
pub fn looks_like_video(media_ref: &str) -> bool {
    media_ref.starts_with("data:video") || video_extension().is_match(media_ref)
}

/// An explicit hint wins; otherwise sniff the primary media reference.
pub fn is_video(entry: &CatalogEntry) -> bool {
    entry.is_video_hint.unwrap_or(false)
        || entry
            .primary_media_ref
            .as_deref()
            .is_some_and(looks_like_video)
}
