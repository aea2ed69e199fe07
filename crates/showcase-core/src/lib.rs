//! Coverage synchronization and subscriber broadcast for the Showcase
//! catalog.
//!
//! The crate keeps a server-side cache of provider records filled until
//! every observed genre has enough shows, and pushes each cache change to
//! all live stream subscribers.
//!
//! # Architecture
//!
//! ```text
//! trigger (subscriber connects / admin call)
//!     |
//!     +-- CoverageCoordinator::ensure_coverage  (one pass at a time)
//!             |
//!             +-- Catalog: fetch page -> merge -> count -> persist
//!                     |
//!                     +-- SubscriberRegistry::broadcast --> every sink
//!
//! search request
//!     +-- Catalog::ingest_search_results  (bypasses the coverage gate)
//! ```
//!
//! # Modules
//!
//! - [`broadcast`] -- Live subscriber set and best-effort fan-out
//! - [`catalog`] -- Merge, count, and broadcast primitives plus search ingestion
//! - [`config`] -- YAML configuration with environment overrides
//! - [`coverage`] -- The single-flight coverage pass
//! - [`error`] -- Shared error types
//! - [`provider`] -- The remote catalog seam

pub mod broadcast;
pub mod catalog;
pub mod config;
pub mod coverage;
pub mod error;
pub mod provider;

// Re-export primary types for convenience.
pub use broadcast::{
    Delivery, SUBSCRIBER_CAPACITY, ShowSink, SinkError, SubscriberId, SubscriberRegistry, Subscription,
};
pub use catalog::Catalog;
pub use config::{CatalogConfig, ConfigError, CoverageConfig};
pub use coverage::{CoverageCoordinator, CoverageMode, CoverageReport, CoverageTrigger, RunResult};
pub use error::CoreError;
pub use provider::{CatalogProvider, ProviderError};
