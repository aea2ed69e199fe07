//! The remote catalog seam.
//!
//! The coverage engine only needs two calls from the provider: fetch a
//! numbered page of the full index, and run a free-text search. Either may
//! fail; neither is retried here.

use std::future::Future;

use showcase_types::{SearchHit, Show};

/// Errors returned by a [`CatalogProvider`].
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request could not be sent or timed out.
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("response decode failed: {0}")]
    Decode(String),
}

/// Source of catalog records.
pub trait CatalogProvider: Send + Sync + 'static {
    /// Fetch page `page` (zero-based) of the provider's show index.
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Vec<Show>, ProviderError>> + Send;

    /// Run a free-text search.
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<SearchHit>, ProviderError>> + Send;
}
