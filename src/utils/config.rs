use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::models::Settings;

const ENV_REMOTE_URL: &str = "ILRE_REMOTE_URL";
const ENV_REMOTE_KEY: &str = "ILRE_REMOTE_KEY";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Fill blank remote settings from the environment.
pub fn apply_env_defaults(settings: &mut Settings) {
    if settings.remote.url.trim().is_empty() {
        settings.remote.url = env_value(ENV_REMOTE_URL).unwrap_or_default();
    }
    if settings.remote.key.trim().is_empty() {
        settings.remote.key = env_value(ENV_REMOTE_KEY).unwrap_or_default();
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ilre")
}

pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config").join("settings.json")
}

pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join("ilre.db")
}

/// Read settings, falling back to defaults when no file exists yet.
pub fn read_settings(data_dir: &Path) -> Result<Settings> {
    let path = settings_path(data_dir);
    let mut settings = if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("invalid settings file {}", path.display()))?
    } else {
        Settings::default()
    };

    apply_env_defaults(&mut settings);
    Ok(settings)
}

pub fn write_settings(data_dir: &Path, settings: &Settings) -> Result<PathBuf> {
    let path = settings_path(data_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
