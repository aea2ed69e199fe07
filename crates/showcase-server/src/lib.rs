//! Catalog API server for Showcase.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **SSE endpoint** (`/api/shows/stream`) pushing every cache change to
//!   connected clients; each connection also triggers a coverage pass
//! - **REST endpoints** for the cached shows, the genre tally, and search
//! - **Admin trigger** (`POST /api/coverage`) to start a coverage pass
//! - **Plain-text status page** (`GET /`)
//!
//! plus [`tvmaze::TvMazeClient`], the `reqwest` client that feeds the
//! cache from the `TVmaze` API.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod sse;
pub mod state;
pub mod tvmaze;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::AppState;
pub use tvmaze::TvMazeClient;
