//! `Dragonfly` (Redis-compatible) cache backend.
//!
//! Blobs are stored as plain string values holding JSON. The backend is
//! untyped; [`CacheStore`](crate::CacheStore) layers the typed accessors on
//! top.

use fred::prelude::*;

use crate::error::CacheError;

/// Connection handle to a `Dragonfly` (Redis-compatible) instance.
///
/// Wraps a [`fred::prelude::Client`]. Cloning shares the connection.
#[derive(Clone)]
pub struct DragonflyPool {
    client: Client,
}

impl DragonflyPool {
    /// Connect to `Dragonfly` at the given URL.
    ///
    /// The URL should follow the Redis URL scheme:
    /// `redis://host:port` or `redis://host:port/db`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Config`] if the URL cannot be parsed.
    /// Returns [`CacheError::Dragonfly`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let config = Config::from_url(url)
            .map_err(|e| CacheError::Config(format!("Invalid Dragonfly URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!("Connected to Dragonfly");
        Ok(Self { client })
    }

    /// Read the raw string stored at `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Dragonfly`] if the read fails.
    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let value: Option<String> = self.client.get(key).await?;
        Ok(value)
    }

    /// Store `value` at `key`, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Dragonfly`] if the write fails.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let _: () = self.client.set(key, value, None, None, false).await?;
        Ok(())
    }

    /// Delete a key.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Dragonfly`] if the delete fails.
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let _: u32 = self.client.del(key).await?;
        Ok(())
    }
}
