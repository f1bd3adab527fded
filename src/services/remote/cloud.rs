use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, Url};
use std::collections::BTreeSet;

use super::{RemoteConfig, RemoteStore};
use crate::error::GatewayError;
use crate::models::{RemoteRow, RemoteSettings};

struct CloudClient {
    http: reqwest::Client,
    endpoint: Url,
}

/// HTTP gateway to a PostgREST table.
///
/// The client handle is built once at construction. A gateway built without
/// a usable configuration stays disconnected for its whole lifetime.
pub struct CloudGateway {
    client: Option<CloudClient>,
}

impl CloudGateway {
    pub fn new(config: RemoteConfig) -> Result<Self, GatewayError> {
        let endpoint = config.table_endpoint()?;

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.key)
            .map_err(|_| GatewayError::Configuration("remote key contains invalid characters".to_string()))?;
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.key))
            .map_err(|_| GatewayError::Configuration("remote key contains invalid characters".to_string()))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GatewayError::Configuration(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client: Some(CloudClient { http, endpoint }),
        })
    }

    pub fn disconnected() -> Self {
        Self { client: None }
    }

    /// Build from user settings. Missing or invalid settings give a
    /// disconnected gateway instead of an error.
    pub fn from_settings(settings: &RemoteSettings) -> Self {
        match RemoteConfig::from_settings(settings).and_then(|c| c.map(Self::new).transpose()) {
            Ok(Some(gateway)) => gateway,
            Ok(None) => {
                log::debug!("No remote configured, running offline");
                Self::disconnected()
            }
            Err(e) => {
                log::warn!("Remote disabled: {}", e);
                Self::disconnected()
            }
        }
    }

    fn client(&self) -> Result<&CloudClient, GatewayError> {
        self.client
            .as_ref()
            .ok_or_else(|| GatewayError::Configuration("no remote url/key set".to_string()))
    }
}

async fn check(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(GatewayError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// PostgREST `in` filter with every id quoted.
fn in_filter(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

/// Union of the keys present in `rows`. Rows omit absent optionals, so the
/// column list has to be given explicitly for a bulk insert.
fn column_list(rows: &[RemoteRow]) -> Result<String, GatewayError> {
    let mut columns = BTreeSet::new();
    for row in rows {
        let value = serde_json::to_value(row).map_err(|source| GatewayError::Encode {
            id: row.id.clone(),
            source,
        })?;
        if let Some(obj) = value.as_object() {
            columns.extend(obj.keys().cloned());
        }
    }
    Ok(columns.into_iter().collect::<Vec<_>>().join(","))
}

#[async_trait]
impl RemoteStore for CloudGateway {
    fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    async fn ping(&self) -> Result<(), GatewayError> {
        let client = self.client()?;
        let response = client
            .http
            .get(client.endpoint.clone())
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<RemoteRow>, GatewayError> {
        let client = self.client()?;
        let response = client
            .http
            .get(client.endpoint.clone())
            .query(&[("select", "*")])
            .send()
            .await?;
        let rows = check(response).await?.json::<Vec<RemoteRow>>().await?;
        Ok(rows)
    }

    async fn bulk_upsert(&self, rows: &[RemoteRow]) -> Result<(), GatewayError> {
        let client = self.client()?;
        if rows.is_empty() {
            return Ok(());
        }

        let response = client
            .http
            .post(client.endpoint.clone())
            .query(&[("columns", column_list(rows)?)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn bulk_delete(&self, ids: &[String]) -> Result<(), GatewayError> {
        let client = self.client()?;
        if ids.is_empty() {
            return Ok(());
        }

        let response = client
            .http
            .delete(client.endpoint.clone())
            .query(&[("id", in_filter(ids))])
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
