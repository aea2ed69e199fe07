//! `TVmaze` HTTP client.
//!
//! Implements [`CatalogProvider`] over the public `TVmaze` REST API:
//! `GET {base}/shows?page={n}` for the paged index and
//! `GET {base}/search/shows?q={query}` for free-text search.

use std::time::Duration;

use serde::de::DeserializeOwned;
use showcase_core::config::ProviderConfig;
use showcase_core::{CatalogProvider, ProviderError};
use showcase_types::{SearchHit, Show};
use tracing::debug;

/// Catalog provider backed by the `TVmaze` API.
#[derive(Debug, Clone)]
pub struct TvMazeClient {
    client: reqwest::Client,
    base_url: String,
}

impl TvMazeClient {
    /// Build a client with the configured base URL and request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Request`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("showcase/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Request(format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::Request(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(format!("GET {url}: {e}")))
    }
}

impl CatalogProvider for TvMazeClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Show>, ProviderError> {
        let page_param = page.to_string();
        let shows: Vec<Show> = self.get_json("/shows", &[("page", &page_param)]).await?;
        debug!(page, count = shows.len(), "Fetched index page");
        Ok(shows)
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        let hits: Vec<SearchHit> = self.get_json("/search/shows", &[("q", query)]).await?;
        debug!(query, count = hits.len(), "Search returned");
        Ok(hits)
    }
}
