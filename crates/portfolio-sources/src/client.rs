use std::time::Duration;

use anyhow::{Context, Result};
use portfolio_core::{ensure_success, HttpConfig, UpstreamError};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Shared upstream client with an explicit, bounded timeout.
pub fn build_client(http: &HttpConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(http.timeout_secs))
        .user_agent(http.user_agent.as_str())
        .build()
        .context("Failed to create HTTP client")
}

/// Sends `request` and decodes a 2xx JSON body, classifying every failure.
pub(crate) async fn send_json<T: DeserializeOwned>(
    service: &str,
    request: RequestBuilder,
) -> Result<T, UpstreamError> {
    let response = request.send().await.map_err(UpstreamError::transport)?;
    ensure_success(service, response.status().as_u16())?;
    let body = response.text().await.map_err(UpstreamError::transport)?;
    serde_json::from_str(&body).map_err(UpstreamError::malformed)
}

pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
