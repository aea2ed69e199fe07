//! In-process cache backend.
//!
//! Holds the same JSON strings the `Dragonfly` backend would, so values go
//! through a full serialize/deserialize round trip either way. Contents
//! live as long as the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::error::CacheError;

/// Shared in-memory key-value map. Cloning shares the contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    reject_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the raw string stored at `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    /// Store `value` at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unavailable`] while writes are being rejected
    /// (see [`MemoryStore::set_reject_writes`]).
    pub async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        if self.reject_writes.load(Ordering::Acquire) {
            return Err(CacheError::Unavailable(format!("write to {key} rejected")));
        }
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    /// Remove `key`.
    pub async fn delete(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Make every subsequent write fail until switched back off. Used to
    /// exercise persistence outages.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::Release);
    }
}
