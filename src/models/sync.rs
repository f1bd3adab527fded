use serde::{Deserialize, Serialize};

/// Outcome of a push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushReport {
    pub uploaded: usize,
    pub deleted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PushReport {
    pub fn unchanged() -> Self {
        Self {
            uploaded: 0,
            deleted: 0,
            message: Some("no local changes, nothing to sync".to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.uploaded == 0 && self.deleted == 0
    }
}

/// What the sync indicator currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum SyncStatus {
    Idle,
    Uploading,
    Downloading,
    Succeeded(String),
    Failed(String),
}

impl SyncStatus {
    /// Terminal states are cleared automatically after the display interval.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncStatus::Succeeded(_) | SyncStatus::Failed(_))
    }

    pub fn message(&self) -> &str {
        match self {
            SyncStatus::Idle => "",
            SyncStatus::Uploading => "syncing...",
            SyncStatus::Downloading => "downloading...",
            SyncStatus::Succeeded(msg) | SyncStatus::Failed(msg) => msg,
        }
    }
}
