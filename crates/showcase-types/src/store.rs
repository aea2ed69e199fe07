//! The cached record set.
//!
//! [`ShowsCache`] is the value persisted under `store:records`. It maps
//! show ids to full records and remembers how far the last coverage pass
//! walked the provider's page list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::show::{Show, ShowId};

/// Cached records keyed by id, plus the provider page watermark.
///
/// Records are only ever added or overwritten, never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowsCache {
    /// Every cached record, keyed by its id.
    pub by_id: BTreeMap<ShowId, Show>,
    /// Highest provider page index merged by the most recent coverage
    /// pass. Zero until a pass has recorded one.
    #[serde(default)]
    pub pages_fetched: u32,
}

impl ShowsCache {
    /// Create an empty cache with no pages recorded.
    pub const fn new() -> Self {
        Self {
            by_id: BTreeMap::new(),
            pages_fetched: 0,
        }
    }

    /// Merge a page of records into the cache.
    ///
    /// Each incoming record replaces any cached record with the same id
    /// wholesale (no field-level merge). Merging the same page twice leaves
    /// the cache unchanged the second time.
    pub fn merge_page(&mut self, shows: &[Show]) -> &mut Self {
        for show in shows {
            self.by_id.insert(show.id, show.clone());
        }
        self
    }

    /// Look up a cached record.
    pub fn get(&self, id: ShowId) -> Option<&Show> {
        self.by_id.get(&id)
    }

    /// Iterate all cached records in id order.
    pub fn shows(&self) -> impl Iterator<Item = &Show> {
        self.by_id.values()
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
