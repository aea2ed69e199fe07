//! Error types for the coverage engine.
//!
//! [`CoreError`] covers everything that can end a coverage pass or a
//! search ingestion. None of them are fatal to the process: the failed
//! operation stops, whatever it already persisted stays persisted, and
//! the next trigger starts over from there.

use showcase_cache::CacheError;

use crate::provider::ProviderError;

/// Errors that abort a coverage pass or a search ingestion.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The remote catalog could not be fetched or decoded.
    #[error("provider error: {source}")]
    Provider {
        /// The underlying provider error.
        #[from]
        source: ProviderError,
    },

    /// The cache could not be read or written.
    #[error("cache error: {source}")]
    Cache {
        /// The underlying cache error.
        #[from]
        source: CacheError,
    },

    /// The pass task ended without producing a result (panic or runtime
    /// shutdown).
    #[error("coverage pass aborted: {0}")]
    Aborted(String),
}
