//! REST clients for the two reporting backends
//!
//! - `servicedesk`: helpdesk ticketing API (authenticate, ticket search, notes)
//! - `assets`: RMM asset inventory API (skip/top paged asset list)

pub mod assets;
pub mod servicedesk;

pub use assets::{AssetApi, AssetClient};
pub use servicedesk::{Credentials, ServiceDeskApi, ServiceDeskClient};

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::error::ApiError;

/// Send a request and decode a JSON body, mapping transport and status failures
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> Result<T, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::network(provider, e.to_string()))?;

    let status = response.status();
    debug!(provider, status = status.as_u16(), url = %response.url(), "response");
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match status.as_u16() {
            401 => ApiError::unauthorized(provider),
            403 => ApiError::forbidden(provider),
            code => ApiError::http(provider, code, body),
        });
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::parse(provider, e.to_string()))
}
