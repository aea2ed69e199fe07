//! Shared type definitions for the Showcase catalog cache.
//!
//! This crate is the single source of truth for the records, cache
//! snapshots, and stream payloads used across the Showcase workspace.
//! Wire-facing types flow downstream to `TypeScript` via `ts-rs` for the
//! browser client.
//!
//! # Modules
//!
//! - [`show`] -- Catalog records (`Show`) as returned by the provider
//! - [`store`] -- The cached record set and its page watermark
//! - [`genres`] -- Per-genre occurrence tallies
//! - [`update`] -- Stream payloads and provider search hits
//! - [`query`] -- Read-side helpers (genre filter, rating sort)

pub mod genres;
pub mod query;
pub mod show;
pub mod store;
pub mod update;

// Re-export all public types at crate root for convenience.
pub use genres::GenreCounts;
pub use query::{shows_in_genre, sort_by_rating};
pub use show::{Image, Rating, Show, ShowId};
pub use store::ShowsCache;
pub use update::{SearchHit, ShowsUpdate};
