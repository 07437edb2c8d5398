//! HTTP edge of the pipeline
//!
//! One client, plain GETs, a fixed browser-identifying user agent, and a
//! bounded per-request timeout. A non-success status is a hard failure for
//! the current pass; nothing is retried here (the resume driver restarts
//! the whole pass instead).

use crate::config::SourceConfig;
use crate::{BinderyError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client used for every catalogue and chapter request
pub fn build_http_client(config: &SourceConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page and returns its body as text
///
/// Any network-level failure or non-2xx status aborts the current pipeline
/// pass by propagating an error.
pub async fn fetch_html(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| BinderyError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(BinderyError::BadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| BinderyError::Http {
        url: url.to_string(),
        source,
    })
}
