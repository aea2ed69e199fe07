//! The single-flight coverage pass.
//!
//! A coverage pass either revalidates the pages a previous pass already
//! walked, or, on a cold cache, walks provider pages from zero until every
//! observed genre has at least `min_per_genre` shows or `max_pages` pages
//! have been merged.
//!
//! # Single flight
//!
//! [`CoverageCoordinator`] owns an in-flight slot. The first caller of
//! [`CoverageCoordinator::ensure_coverage`] spawns the pass on its own task
//! and parks a shared handle to its result in the slot; later callers find
//! the handle and await the same result instead of starting a second pass.
//! The pass task clears the slot itself on the way out (success, error,
//! panic, or runtime shutdown), so the next trigger after it finishes
//! always starts a fresh pass. Dropping a caller's future never cancels
//! the pass.
//!
//! The slot belongs to the coordinator instance, not the process: two
//! coordinators never see each other's runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, error, info};

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::provider::CatalogProvider;

/// The result every caller joined to a pass receives.
pub type RunResult = Result<CoverageReport, Arc<CoreError>>;

type SharedRun = Shared<BoxFuture<'static, RunResult>>;

/// Which branch a pass took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageMode {
    /// No earlier pass had recorded pages; pages were walked from zero.
    ColdFill {
        /// Index of the last page merged, now persisted as the watermark.
        pages_fetched: u32,
        /// Whether every genre reached the threshold before the page cap.
        satisfied: bool,
    },
    /// Pages `0..=pages` were fetched again and the tally rebuilt.
    Revalidated {
        /// The watermark that was revalidated.
        pages: u32,
    },
}

/// Summary of a finished pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    /// Coordinator-local run number, starting at zero.
    pub run_id: u64,
    /// Branch taken.
    pub mode: CoverageMode,
    /// Number of records cached when the pass finished.
    pub shows_cached: usize,
    /// Wall-clock completion time.
    pub finished_at: DateTime<Utc>,
}

/// What a trigger did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageTrigger {
    /// A new pass was started.
    Started(u64),
    /// A pass was already running; the caller joined it.
    Joined(u64),
}

impl CoverageTrigger {
    /// Run number of the started or joined pass.
    pub const fn run_id(self) -> u64 {
        match self {
            Self::Started(id) | Self::Joined(id) => id,
        }
    }
}

struct InFlight {
    run_id: u64,
    outcome: SharedRun,
}

type Slot = Arc<Mutex<Option<InFlight>>>;

/// Runs coverage passes one at a time over a shared [`Catalog`].
pub struct CoverageCoordinator<P> {
    catalog: Arc<Catalog<P>>,
    inflight: Slot,
    next_run_id: AtomicU64,
}

impl<P: CatalogProvider> CoverageCoordinator<P> {
    /// Create a coordinator with no pass running.
    pub fn new(catalog: Arc<Catalog<P>>) -> Self {
        Self {
            catalog,
            inflight: Arc::new(Mutex::new(None)),
            next_run_id: AtomicU64::new(0),
        }
    }

    /// The catalog passes run against.
    pub const fn catalog(&self) -> &Arc<Catalog<P>> {
        &self.catalog
    }

    /// Whether a pass is in flight.
    pub fn is_running(&self) -> bool {
        lock(&self.inflight).is_some()
    }

    /// Make sure a coverage pass runs, and wait for it.
    ///
    /// Starts a pass if none is running, otherwise joins the running one.
    /// Every caller joined to the same pass gets the same result.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn ensure_coverage(&self) -> RunResult {
        let (_, outcome) = self.join_or_start();
        outcome.await
    }

    /// Start or join a pass without waiting for it.
    ///
    /// The pass keeps running after this returns and logs its own outcome.
    pub fn trigger(&self) -> CoverageTrigger {
        let (trigger, _) = self.join_or_start();
        trigger
    }

    fn join_or_start(&self) -> (CoverageTrigger, SharedRun) {
        let mut slot = lock(&self.inflight);
        if let Some(run) = slot.as_ref() {
            debug!(run_id = run.run_id, "Joining in-flight coverage pass");
            return (CoverageTrigger::Joined(run.run_id), run.outcome.clone());
        }

        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        let catalog = Arc::clone(&self.catalog);
        let release = RunRelease {
            slot: Arc::clone(&self.inflight),
            run_id,
        };

        // The slot lock is still held here, so the task cannot clear the
        // slot before the handle below has been installed.
        let task = tokio::spawn(async move {
            let _release = release;
            let result = run_pass(&catalog, run_id).await;
            match &result {
                Ok(report) => info!(
                    run_id,
                    mode = ?report.mode,
                    shows_cached = report.shows_cached,
                    "Coverage pass finished"
                ),
                Err(e) => error!(run_id, error = %e, "Coverage pass failed"),
            }
            result
        });

        let outcome: SharedRun = task
            .map(|joined| match joined {
                Ok(result) => result.map_err(Arc::new),
                Err(e) => Err(Arc::new(CoreError::Aborted(e.to_string()))),
            })
            .boxed()
            .shared();

        *slot = Some(InFlight {
            run_id,
            outcome: outcome.clone(),
        });
        (CoverageTrigger::Started(run_id), outcome)
    }
}

/// Clears the in-flight slot when the pass task ends, however it ends.
struct RunRelease {
    slot: Slot,
    run_id: u64,
}

impl Drop for RunRelease {
    fn drop(&mut self) {
        let mut slot = lock(&self.slot);
        if slot.as_ref().is_some_and(|run| run.run_id == self.run_id) {
            *slot = None;
        }
    }
}

fn lock(slot: &Mutex<Option<InFlight>>) -> MutexGuard<'_, Option<InFlight>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One coverage pass: revalidate when a watermark exists, else cold fill.
async fn run_pass<P: CatalogProvider>(
    catalog: &Catalog<P>,
    run_id: u64,
) -> Result<CoverageReport, CoreError> {
    let previous = catalog.cached_shows().await?.pages_fetched;

    let mode = if previous > 0 {
        info!(run_id, pages = previous, "Revalidating cached pages");
        revalidate(catalog, previous).await?
    } else {
        info!(run_id, "Cold-filling catalog cache");
        cold_fill(catalog).await?
    };

    let shows_cached = catalog.cached_shows().await?.len();
    Ok(CoverageReport {
        run_id,
        mode,
        shows_cached,
        finished_at: Utc::now(),
    })
}

/// Re-fetch pages `0..=pages`, then rebuild the tally from the whole cache.
///
/// Per-page broadcasts carry the tally as it stood before the rebuild; the
/// closing broadcast carries no records and the rebuilt tally.
async fn revalidate<P: CatalogProvider>(
    catalog: &Catalog<P>,
    pages: u32,
) -> Result<CoverageMode, CoreError> {
    for page in 0..=pages {
        let shows = catalog.fetch_and_merge_page(page).await?;
        let counts = catalog.genre_counts().await?;
        catalog.broadcast(Some(shows), counts);
    }

    let counts = catalog.recount_genres().await?;
    catalog.broadcast(None, counts);
    Ok(CoverageMode::Revalidated { pages })
}

/// Walk pages from zero until every genre is satisfied or the page cap is
/// hit, then persist the index of the last merged page as the watermark.
async fn cold_fill<P: CatalogProvider>(catalog: &Catalog<P>) -> Result<CoverageMode, CoreError> {
    let limits = catalog.coverage();
    catalog.store().reset_genre_counts().await?;

    let mut last_merged = 0;
    let mut satisfied = false;
    for page in 0..limits.max_pages {
        let shows = catalog.fetch_and_merge_page(page).await?;
        let counts = catalog.add_genre_counts(&shows).await?;
        last_merged = page;
        satisfied = counts.is_satisfied(limits.min_per_genre);
        if !satisfied {
            debug!(page, lacking = ?counts.lacking(limits.min_per_genre), "Genres still short");
        }
        catalog.broadcast(Some(shows), counts);
        if satisfied {
            break;
        }
    }

    catalog.record_pages_fetched(last_merged).await?;
    Ok(CoverageMode::ColdFill {
        pages_fetched: last_merged,
        satisfied,
    })
}
