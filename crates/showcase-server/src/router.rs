//! Axum router construction for the catalog API.
//!
//! Assembles all routes (REST + SSE) into a single [`Router`] with CORS
//! middleware enabled so a browser front end on another origin can read
//! the stream.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use showcase_core::CatalogProvider;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::sse;
use crate::state::AppState;

/// Build the complete Axum router for the catalog server.
///
/// The router includes:
/// - `GET /` -- plain-text status page
/// - `GET /api/shows` -- cached shows
/// - `GET /api/shows/stream` -- SSE update stream
/// - `GET /api/genres` -- genre tally
/// - `GET /api/search?query=` -- provider search with ingestion
/// - `POST /api/coverage` -- start or join a coverage pass
pub fn build_router<P: CatalogProvider>(state: Arc<AppState<P>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index::<P>))
        // SSE
        .route("/api/shows/stream", get(sse::shows_stream::<P>))
        // REST API
        .route("/api/shows", get(handlers::list_shows::<P>))
        .route("/api/genres", get(handlers::genres::<P>))
        .route("/api/search", get(handlers::search::<P>))
        .route("/api/coverage", post(handlers::trigger_coverage::<P>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
