//! Backend dispatch and typed accessors for the two catalog blobs.
//!
//! Uses enum dispatch over the concrete backends rather than a trait
//! object, since async methods are not dyn-compatible.

use serde::Serialize;
use serde::de::DeserializeOwned;
use showcase_types::{GenreCounts, ShowsCache};
use tracing::{debug, warn};

use crate::dragonfly::DragonflyPool;
use crate::error::CacheError;
use crate::memory::MemoryStore;

/// Key holding the cached record set.
pub const SHOWS_KEY: &str = "store:records";

/// Key holding the genre tally.
pub const GENRE_COUNTS_KEY: &str = "store:genreCounts";

/// Durable key-value store behind the catalog.
///
/// Writes are whole-value overwrites; the last writer wins.
#[derive(Clone)]
pub enum CacheStore {
    /// `Dragonfly`/Redis backend shared across restarts.
    Dragonfly(DragonflyPool),
    /// Process-local backend.
    Memory(MemoryStore),
}

impl CacheStore {
    /// Connect to `Dragonfly` when a URL is given, otherwise fall back to
    /// an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the `Dragonfly` connection fails.
    pub async fn connect(dragonfly_url: Option<&str>) -> Result<Self, CacheError> {
        match dragonfly_url {
            Some(url) => Ok(Self::Dragonfly(DragonflyPool::connect(url).await?)),
            None => {
                warn!("No Dragonfly URL configured, cache will not survive restarts");
                Ok(Self::memory())
            }
        }
    }

    /// A fresh, empty in-memory store.
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    /// Human-readable backend name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Dragonfly(_) => "dragonfly",
            Self::Memory(_) => "memory",
        }
    }

    // =========================================================================
    // Generic JSON get/set
    // =========================================================================

    /// Read and decode the value at `key`, or `T::default()` if the key is
    /// absent or its contents cannot be decoded.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] only if the backend read itself fails.
    pub async fn get_json_or_default<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: DeserializeOwned + Default,
    {
        let raw = match self {
            Self::Dragonfly(pool) => pool.get(key).await?,
            Self::Memory(store) => store.get(key).await,
        };
        let Some(raw) = raw else {
            debug!(key, "Cache key absent, using empty value");
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, error = %e, "Discarding unreadable cache value");
                Ok(T::default())
            }
        }
    }

    /// Serialize `value` as JSON and store it at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Serialization`] if serialization fails, or the
    /// backend's error if the write fails.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;
        match self {
            Self::Dragonfly(pool) => pool.set(key, &json).await,
            Self::Memory(store) => store.set(key, json).await,
        }
    }

    // =========================================================================
    // Record set -- store:records
    // =========================================================================

    /// Load the cached record set.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend read fails.
    pub async fn load_shows(&self) -> Result<ShowsCache, CacheError> {
        self.get_json_or_default(SHOWS_KEY).await
    }

    /// Persist the full record set.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if serialization or the write fails.
    pub async fn save_shows(&self, shows: &ShowsCache) -> Result<(), CacheError> {
        self.set_json(SHOWS_KEY, shows).await
    }

    // =========================================================================
    // Genre tally -- store:genreCounts
    // =========================================================================

    /// Load the genre tally.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend read fails.
    pub async fn load_genre_counts(&self) -> Result<GenreCounts, CacheError> {
        self.get_json_or_default(GENRE_COUNTS_KEY).await
    }

    /// Persist the genre tally.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if serialization or the write fails.
    pub async fn save_genre_counts(&self, counts: &GenreCounts) -> Result<(), CacheError> {
        self.set_json(GENRE_COUNTS_KEY, counts).await
    }

    /// Overwrite the genre tally with an empty one.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the write fails.
    pub async fn reset_genre_counts(&self) -> Result<(), CacheError> {
        self.save_genre_counts(&GenreCounts::new()).await
    }
}
