use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::models::Settings;
use crate::services::RemoteConfig;
use crate::utils::config;

pub fn get_settings(data_dir: &Path) -> Result<Settings> {
    config::read_settings(data_dir)
}

/// Update the remote section. `None` leaves the stored value as is.
///
/// The new values are validated before anything is written.
pub fn update_remote_settings(
    data_dir: &Path,
    url: Option<String>,
    key: Option<String>,
    table: Option<String>,
) -> Result<PathBuf> {
    let mut settings = config::read_settings(data_dir)?;
    if let Some(url) = url {
        settings.remote.url = url.trim().to_string();
    }
    if let Some(key) = key {
        settings.remote.key = key.trim().to_string();
    }
    if let Some(table) = table {
        settings.remote.table = table.trim().to_string();
    }

    RemoteConfig::from_settings(&settings.remote)?;
    config::write_settings(data_dir, &settings)
}
