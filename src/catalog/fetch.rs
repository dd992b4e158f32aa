//! Retrieval of the raw catalog page.
//!
//! Kept apart from [`parser`](super::parser) so parsing stays a pure function
//! that fixture tests can exercise without a live endpoint.

use crate::constants::{CATALOG_TIMEOUT, CATALOG_URL};
use crate::utils::http::build_client;
use anyhow::{Context, Result, bail};
use tracing::{debug, info};

/// HTTP client for the Chrome for Testing dashboard.
pub struct CatalogClient {
    url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Client for the official dashboard.
    pub fn new() -> Result<Self> {
        Self::with_url(CATALOG_URL)
    }

    /// Client for a custom catalog location, such as a mirror or a test server.
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let client = build_client(CATALOG_TIMEOUT).context("Failed to build HTTP client")?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// The page this client fetches.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the catalog page body.
    ///
    /// # Errors
    ///
    /// Fails when the host is unreachable, the request times out, or the
    /// server answers with a non-success status.
    pub async fn fetch_page(&self) -> Result<String> {
        info!("Fetching catalog from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to reach catalog at {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Catalog request to {} failed with HTTP status {}", self.url, status);
        }

        let body = response.text().await.context("Failed to read catalog response body")?;
        debug!("Catalog page received ({} bytes)", body.len());
        Ok(body)
    }
}
