//! Page fetching over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{HarvestError, Result};

/// Fetches a page body by URL. Seam between the network and the parsers so
/// extraction logic can be exercised without a server.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// reqwest-backed fetcher with explicit timeouts.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("blogharvest/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| HarvestError::Configuration(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_request_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| classify_request_error(e, url))
    }
}

fn classify_request_error(err: reqwest::Error, url: &str) -> HarvestError {
    if err.is_timeout() {
        HarvestError::Timeout(format!("{url}: {err}"))
    } else {
        HarvestError::Network(format!("{url}: {err}"))
    }
}
