//! Shared application state for the API server.

use std::sync::Arc;

use showcase_core::{Catalog, CatalogProvider, CoverageCoordinator};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
pub struct AppState<P> {
    /// The cached catalog and its subscribers.
    pub catalog: Arc<Catalog<P>>,
    /// Single-flight coverage runner over `catalog`.
    pub coordinator: CoverageCoordinator<P>,
}

impl<P: CatalogProvider> AppState<P> {
    /// Wrap `catalog` with a fresh coordinator.
    pub fn new(catalog: Catalog<P>) -> Self {
        let catalog = Arc::new(catalog);
        let coordinator = CoverageCoordinator::new(Arc::clone(&catalog));
        Self {
            catalog,
            coordinator,
        }
    }
}
