use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub version: String,
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub sync: SyncSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            remote: RemoteSettings::default(),
            sync: SyncSettings::default(),
        }
    }
}

/// Where the cloud copy lives. Blank `url` or `key` means offline only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            key: String::new(),
            table: default_table(),
        }
    }
}

fn default_table() -> String {
    "prompts".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// How long a finished sync's result stays on the indicator.
    #[serde(default = "default_status_display_secs")]
    pub status_display_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            status_display_secs: default_status_display_secs(),
        }
    }
}

fn default_status_display_secs() -> u64 {
    3
}
