//! Scripted catalog provider shared by the integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use showcase_cache::CacheStore;
use showcase_core::{Catalog, CatalogProvider, CoverageConfig, ProviderError};
use showcase_types::{SearchHit, Show};
use tokio::sync::Semaphore;

/// Provider serving pre-built pages and search hits, recording every call.
pub struct ScriptedProvider {
    pages: Vec<Vec<Show>>,
    hits: Vec<SearchHit>,
    fetches: AtomicUsize,
    requested: Mutex<Vec<u32>>,
    fail_on: Mutex<Option<u32>>,
    gate: Semaphore,
}

impl ScriptedProvider {
    /// Provider whose fetches complete immediately.
    pub fn new(pages: Vec<Vec<Show>>) -> Self {
        Self {
            pages,
            hits: Vec::new(),
            fetches: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
            fail_on: Mutex::new(None),
            gate: Semaphore::new(Semaphore::MAX_PERMITS),
        }
    }

    /// Provider whose fetches wait until [`ScriptedProvider::open_gate`].
    pub fn gated(pages: Vec<Vec<Show>>) -> Self {
        Self {
            gate: Semaphore::new(0),
            ..Self::new(pages)
        }
    }

    /// Provider that also answers searches.
    pub fn with_hits(mut self, hits: Vec<SearchHit>) -> Self {
        self.hits = hits;
        self
    }

    /// Let held fetches through.
    pub fn open_gate(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    /// Make fetches of `page` fail (or stop failing with `None`).
    pub fn fail_on(&self, page: Option<u32>) {
        *self.fail_on.lock().unwrap() = page;
    }

    /// Total page fetches attempted.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Page indexes requested, in order.
    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

impl CatalogProvider for ScriptedProvider {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Show>, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(page);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        drop(permit);

        if *self.fail_on.lock().unwrap() == Some(page) {
            return Err(ProviderError::Status {
                status: 503,
                body: format!("page {page} unavailable"),
            });
        }
        usize::try_from(page)
            .ok()
            .and_then(|index| self.pages.get(index))
            .cloned()
            .ok_or_else(|| ProviderError::Status {
                status: 404,
                body: String::from("Not Found"),
            })
    }

    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        Ok(self.hits.clone())
    }
}

/// `count` pages of `per_page` shows, every show tagged with `genres`.
pub fn uniform_pages(count: u64, per_page: u64, genres: &[&str]) -> Vec<Vec<Show>> {
    (0..count)
        .map(|page| {
            (0..per_page)
                .map(|i| Show::new(page * 100 + i, format!("Show {page}-{i}"), genres))
                .collect()
        })
        .collect()
}

/// `count` pages of one show each, each carrying a genre no other page has,
/// so the tally can never be satisfied.
pub fn never_satisfied_pages(count: u64) -> Vec<Vec<Show>> {
    (0..count)
        .map(|page| {
            let rare = format!("Rare{page}");
            vec![Show::new(page * 100, format!("Show {page}"), &["Drama", rare.as_str()])]
        })
        .collect()
}

/// A catalog over a fresh in-memory store, returning the store too.
pub fn catalog(provider: ScriptedProvider) -> (Arc<Catalog<ScriptedProvider>>, CacheStore) {
    let store = CacheStore::memory();
    let catalog = Arc::new(Catalog::new(provider, store.clone(), CoverageConfig::default()));
    (catalog, store)
}
