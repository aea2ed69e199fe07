//! Error types for the cache layer.
//!
//! All errors are propagated via [`CacheError`] which wraps the underlying
//! [`fred`] and [`serde_json`] errors.

/// Errors that can occur in the cache layer.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A `Dragonfly`/Redis operation failed.
    #[error("Dragonfly error: {0}")]
    Dragonfly(#[from] fred::error::Error),

    /// A value could not be serialized for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
