//! Merge, count, and broadcast primitives shared by the coverage pass and
//! search ingestion.
//!
//! Every primitive is a read-modify-write against the [`CacheStore`]: load
//! the current blob, change it, persist it, then broadcast. Nothing here
//! serializes callers. The coverage pass is kept single-flight by
//! [`CoverageCoordinator`](crate::CoverageCoordinator); search ingestion is
//! not gated at all, so an ingestion that interleaves with a coverage pass
//! can lose a genre tally update. The next full recount repairs it.

use showcase_cache::CacheStore;
use showcase_types::{GenreCounts, Show, ShowsCache, ShowsUpdate};
use tracing::{debug, info};

use crate::broadcast::{Delivery, SubscriberRegistry};
use crate::config::CoverageConfig;
use crate::error::CoreError;
use crate::provider::CatalogProvider;

/// The cached catalog together with its provider and live subscribers.
pub struct Catalog<P> {
    provider: P,
    store: CacheStore,
    subscribers: SubscriberRegistry,
    coverage: CoverageConfig,
}

impl<P: CatalogProvider> Catalog<P> {
    /// Create a catalog over `store`, filled from `provider`.
    pub fn new(provider: P, store: CacheStore, coverage: CoverageConfig) -> Self {
        Self {
            provider,
            store,
            subscribers: SubscriberRegistry::new(),
            coverage,
        }
    }

    /// The remote provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The backing store.
    pub const fn store(&self) -> &CacheStore {
        &self.store
    }

    /// The live subscriber set.
    pub const fn subscribers(&self) -> &SubscriberRegistry {
        &self.subscribers
    }

    /// Cold-fill limits.
    pub const fn coverage(&self) -> CoverageConfig {
        self.coverage
    }

    /// Current cached record set.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Cache`] if the store cannot be read.
    pub async fn cached_shows(&self) -> Result<ShowsCache, CoreError> {
        Ok(self.store.load_shows().await?)
    }

    /// Current genre tally.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Cache`] if the store cannot be read.
    pub async fn genre_counts(&self) -> Result<GenreCounts, CoreError> {
        Ok(self.store.load_genre_counts().await?)
    }

    /// Fetch provider page `page` and merge it into the cached record set.
    ///
    /// Returns the page's records. Nothing is written if the fetch fails.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] if the fetch, the load, or the save fails.
    pub async fn fetch_and_merge_page(&self, page: u32) -> Result<Vec<Show>, CoreError> {
        let shows = self.provider.fetch_page(page).await?;
        let cached = self.merge_shows(&shows).await?;
        debug!(page, fetched = shows.len(), cached = cached.len(), "Page merged");
        Ok(shows)
    }

    /// Add the genre tokens of `shows` to the persisted tally and return
    /// the new tally.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Cache`] if the tally cannot be read or written.
    pub async fn add_genre_counts(&self, shows: &[Show]) -> Result<GenreCounts, CoreError> {
        let mut counts = self.store.load_genre_counts().await?;
        counts.merge(&GenreCounts::from_shows(shows));
        self.store.save_genre_counts(&counts).await?;
        Ok(counts)
    }

    /// Reset the persisted tally and rebuild it from every cached record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Cache`] if the store cannot be read or written.
    pub async fn recount_genres(&self) -> Result<GenreCounts, CoreError> {
        let cached = self.store.load_shows().await?;
        self.recount_from(&cached).await
    }

    /// Push a change to every live subscriber.
    pub fn broadcast(&self, shows: Option<Vec<Show>>, counts: GenreCounts) -> Delivery {
        let update = ShowsUpdate { shows, counts };
        let delivery = self.subscribers.broadcast(&update);
        debug!(
            delivered = delivery.delivered,
            failed = delivery.failed,
            "Shows update broadcast"
        );
        delivery
    }

    /// Run a provider search, ingest the hits, and return the matched
    /// records.
    ///
    /// An empty result is returned as-is without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] if the search or the ingestion fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Show>, CoreError> {
        let hits = self.provider.search(query).await?;
        let shows: Vec<Show> = hits.into_iter().map(|hit| hit.show).collect();
        info!(query, hits = shows.len(), "Search completed");
        if !shows.is_empty() {
            self.ingest_search_results(shows.clone()).await?;
        }
        Ok(shows)
    }

    /// Merge ad-hoc search results into the cache, rebuild the tally from
    /// the whole cache, and broadcast the results with the fresh tally.
    ///
    /// Does not wait for or block a running coverage pass.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Cache`] if the store cannot be read or written.
    pub async fn ingest_search_results(&self, shows: Vec<Show>) -> Result<GenreCounts, CoreError> {
        let cached = self.merge_shows(&shows).await?;
        let counts = self.recount_from(&cached).await?;
        self.broadcast(Some(shows), counts.clone());
        Ok(counts)
    }

    /// Persist a new page watermark on the cached record set.
    pub(crate) async fn record_pages_fetched(&self, pages_fetched: u32) -> Result<ShowsCache, CoreError> {
        let mut cached = self.store.load_shows().await?;
        cached.pages_fetched = pages_fetched;
        self.store.save_shows(&cached).await?;
        Ok(cached)
    }

    async fn merge_shows(&self, shows: &[Show]) -> Result<ShowsCache, CoreError> {
        let mut cached = self.store.load_shows().await?;
        cached.merge_page(shows);
        self.store.save_shows(&cached).await?;
        Ok(cached)
    }

    async fn recount_from(&self, cached: &ShowsCache) -> Result<GenreCounts, CoreError> {
        self.store.reset_genre_counts().await?;
        let mut counts = self.store.load_genre_counts().await?;
        counts.merge(&GenreCounts::from_shows(cached.shows()));
        self.store.save_genre_counts(&counts).await?;
        Ok(counts)
    }
}
