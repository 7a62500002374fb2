//! RMM asset inventory API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::send_json;
use crate::api::error::ApiError;
use crate::pipeline::pagination::OffsetPage;
use crate::types::AssetRecord;

const PROVIDER_NAME: &str = "assets";

/// API path appended to `{server}:{port}`
const ASSETS_PATH: &str = "/api/v1.0/assetmgmt/assets";

/// Operations the agent count needs from the inventory backend
#[async_trait]
pub trait AssetApi: Send + Sync {
    /// One `$skip`/`$top` window of the asset list plus the server's total
    async fn list_assets(&self, skip: u64, top: u64) -> Result<OffsetPage<AssetRecord>, ApiError>;
}

/// Asset inventory client authenticated with a pre-issued bearer token
pub struct AssetClient {
    server_url: String,
    port: Option<u16>,
    token: String,
    client: Client,
}

impl AssetClient {
    pub fn new(server_url: impl Into<String>, port: Option<u16>, token: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            port,
            token: token.into(),
            client: Client::new(),
        }
    }

    /// Server URL, optional `:port`, then the fixed API path
    pub fn assets_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}{}", self.server_url, port, ASSETS_PATH),
            None => format!("{}{}", self.server_url, ASSETS_PATH),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssetsResponse {
    #[serde(rename = "TotalRecords", default)]
    total_records: Option<u64>,
    #[serde(rename = "Result", default)]
    result: Option<Vec<AssetRecord>>,
}

#[async_trait]
impl AssetApi for AssetClient {
    async fn list_assets(&self, skip: u64, top: u64) -> Result<OffsetPage<AssetRecord>, ApiError> {
        let url = format!("{}?$skip={}&$top={}", self.assets_url(), skip, top);
        debug!("Request URL: {}", url);

        let request = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token));

        let response: AssetsResponse = send_json(PROVIDER_NAME, request).await?;
        Ok(OffsetPage {
            total_records: response.total_records.unwrap_or(0),
            items: response.result.unwrap_or_default(),
        })
    }
}
