//! Remote gateway: the boundary to the cloud copy of the catalog.
//!
//! Implementations:
//! - `CloudGateway`: PostgREST-style HTTP table (Supabase)
//! - `InMemoryRemote`: process-local table, used for offline demos and tests

use async_trait::async_trait;
use reqwest::Url;

use crate::error::GatewayError;
use crate::models::{RemoteRow, RemoteSettings};

mod cloud;
mod memory;

pub use cloud::CloudGateway;
pub use memory::{InMemoryRemote, RemoteCall, RemoteOp};

/// Bulk access to the remote table. Each call is a single round trip.
///
/// Calls on a disconnected gateway fail with `GatewayError::Configuration`
/// without touching the network.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Cheap reachability check (select one id).
    async fn ping(&self) -> Result<(), GatewayError>;

    async fn fetch_all(&self) -> Result<Vec<RemoteRow>, GatewayError>;

    async fn bulk_upsert(&self, rows: &[RemoteRow]) -> Result<(), GatewayError>;

    async fn bulk_delete(&self, ids: &[String]) -> Result<(), GatewayError>;
}

/// Validated connection settings.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: Url,
    pub key: String,
    pub table: String,
}

impl RemoteConfig {
    /// Returns `Ok(None)` when nothing is configured (offline only).
    pub fn from_settings(settings: &RemoteSettings) -> Result<Option<Self>, GatewayError> {
        let url = settings.url.trim();
        let key = settings.key.trim();
        if url.is_empty() && key.is_empty() {
            return Ok(None);
        }

        if url.is_empty() {
            return Err(GatewayError::Configuration("remote url is missing".to_string()));
        }
        if key.is_empty() {
            return Err(GatewayError::Configuration("remote key is missing".to_string()));
        }

        let mut base_url = Url::parse(url)
            .map_err(|e| GatewayError::Configuration(format!("invalid remote url '{}': {}", url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(GatewayError::Configuration(format!(
                "unsupported remote url scheme '{}'",
                base_url.scheme()
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let table = match settings.table.trim() {
            "" => "prompts".to_string(),
            t => t.to_string(),
        };

        Ok(Some(Self {
            base_url,
            key: key.to_string(),
            table,
        }))
    }

    /// `{base}/rest/v1/{table}`
    pub fn table_endpoint(&self) -> Result<Url, GatewayError> {
        self.base_url
            .join("rest/v1/")
            .and_then(|u| u.join(&self.table))
            .map_err(|e| GatewayError::Configuration(format!("invalid table endpoint: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: &str, key: &str) -> RemoteSettings {
        RemoteSettings {
            url: url.to_string(),
            key: key.to_string(),
            table: "prompts".to_string(),
        }
    }

    #[test]
    fn blank_settings_mean_offline() {
        assert!(RemoteConfig::from_settings(&settings("", "  ")).unwrap().is_none());
    }

    #[test]
    fn half_configured_settings_are_rejected() {
        assert!(matches!(
            RemoteConfig::from_settings(&settings("https://x.supabase.co", "")),
            Err(GatewayError::Configuration(_))
        ));
        assert!(matches!(
            RemoteConfig::from_settings(&settings("not a url", "key")),
            Err(GatewayError::Configuration(_))
        ));
        assert!(matches!(
            RemoteConfig::from_settings(&settings("ftp://x.example", "key")),
            Err(GatewayError::Configuration(_))
        ));
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let config = RemoteConfig::from_settings(&settings("https://x.example/proxy", "key"))
            .unwrap()
            .unwrap();
        assert_eq!(
            config.table_endpoint().unwrap().as_str(),
            "https://x.example/proxy/rest/v1/prompts"
        );
    }
}
