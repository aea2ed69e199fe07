//! Cache persistence for the Showcase catalog.
//!
//! The catalog keeps two JSON blobs: the cached record set and the genre
//! tally. Both are read with get-or-default semantics, so a missing or
//! unreadable blob is treated as empty rather than as an error.
//!
//! # Key Patterns
//!
//! | Key | Type | Description |
//! |-----|------|-------------|
//! | `store:records` | JSON | [`ShowsCache`](showcase_types::ShowsCache) |
//! | `store:genreCounts` | JSON | [`GenreCounts`](showcase_types::GenreCounts) |
//!
//! # Modules
//!
//! - [`dragonfly`] -- `Dragonfly` (Redis-compatible) backend
//! - [`memory`] -- In-process backend for single-node runs and tests
//! - [`store`] -- [`CacheStore`] dispatch plus the typed blob accessors
//! - [`error`] -- Shared error types

pub mod dragonfly;
pub mod error;
pub mod memory;
pub mod store;

// Re-export primary types for convenience.
pub use dragonfly::DragonflyPool;
pub use error::CacheError;
pub use memory::MemoryStore;
pub use store::{CacheStore, GENRE_COUNTS_KEY, SHOWS_KEY};
