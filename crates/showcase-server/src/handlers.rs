//! REST API endpoint handlers for the catalog server.
//!
//! All handlers read from the shared cache through [`AppState`]; only
//! search and the coverage trigger reach the remote provider.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Plain-text status page |
//! | `GET` | `/api/shows` | Cached shows (optionally by genre / sorted by rating) |
//! | `GET` | `/api/genres` | Current genre tally |
//! | `GET` | `/api/search` | Search the provider and ingest the results |
//! | `POST` | `/api/coverage` | Start (or join) a coverage pass |

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use showcase_core::{CatalogProvider, CoverageTrigger};
use showcase_types::{GenreCounts, Show, ShowId, shows_in_genre, sort_by_rating};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/shows` endpoint.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ShowsQuery {
    /// Only return shows tagged with this genre.
    pub genre: Option<String>,
    /// Ordering. The only accepted value is `rating` (best first), which
    /// also switches the response from a map to an array.
    pub sort: Option<String>,
}

/// Query parameters for the `GET /api/search` endpoint.
#[derive(Debug, Default, serde::Deserialize)]
pub struct SearchQuery {
    /// Free-text query forwarded to the provider.
    pub query: Option<String>,
}

// ---------------------------------------------------------------------------
// GET / -- status page
// ---------------------------------------------------------------------------

/// Serve a short plain-text status summary.
pub async fn index<P: CatalogProvider>(State(state): State<Arc<AppState<P>>>) -> Response {
    let catalog = &state.catalog;
    let cache_line = match catalog.cached_shows().await {
        Ok(cache) => format!(
            "cached shows: {}\npages fetched: {}",
            cache.len(),
            cache.pages_fetched
        ),
        Err(e) => format!("cache unavailable: {e}"),
    };

    let body = format!(
        "Showcase catalog server\n\
         cache backend: {}\n\
         subscribers: {}\n\
         coverage running: {}\n\
         {cache_line}\n",
        catalog.store().name(),
        catalog.subscribers().len(),
        state.coordinator.is_running(),
    );

    body.into_response()
}

// ---------------------------------------------------------------------------
// GET /api/shows
// ---------------------------------------------------------------------------

/// Return the cached shows.
///
/// Without `sort` the response is the `{id: show}` map as stored. With
/// `sort=rating` it is an array ordered by rating, best first.
///
/// # Errors
///
/// Returns [`ApiError::InvalidQuery`] for an unknown `sort` value and
/// [`ApiError::Internal`] if the cache cannot be read.
pub async fn list_shows<P: CatalogProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(params): Query<ShowsQuery>,
) -> Result<Response, ApiError> {
    let by_rating = match params.sort.as_deref() {
        None | Some("") => false,
        Some("rating") => true,
        Some(other) => {
            return Err(ApiError::InvalidQuery(format!(
                "unsupported sort '{other}', expected 'rating'"
            )));
        }
    };

    let cache = state.catalog.cached_shows().await?;
    let selected: Vec<&Show> = match params.genre.as_deref() {
        Some(genre) if !genre.is_empty() => shows_in_genre(cache.shows(), genre),
        _ => cache.shows().collect(),
    };

    if by_rating {
        return Ok(Json(sort_by_rating(selected)).into_response());
    }

    let by_id: BTreeMap<ShowId, &Show> = selected.into_iter().map(|s| (s.id, s)).collect();
    Ok(Json(by_id).into_response())
}

// ---------------------------------------------------------------------------
// GET /api/genres
// ---------------------------------------------------------------------------

/// Return the persisted genre tally.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the cache cannot be read.
pub async fn genres<P: CatalogProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> Result<Json<GenreCounts>, ApiError> {
    let counts = state.catalog.genre_counts().await?;
    Ok(Json(counts))
}

// ---------------------------------------------------------------------------
// GET /api/search
// ---------------------------------------------------------------------------

/// Search the provider, ingest the hits into the cache, and return them.
///
/// # Errors
///
/// Returns [`ApiError::InvalidQuery`] when `query` is missing or blank,
/// [`ApiError::Upstream`] when the provider fails, and
/// [`ApiError::Internal`] when the cache cannot be written.
pub async fn search<P: CatalogProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Show>>, ApiError> {
    let query = params.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::InvalidQuery(
            "query parameter 'query' is required".to_owned(),
        ));
    }

    let shows = state.catalog.search(query).await?;
    Ok(Json(shows))
}

// ---------------------------------------------------------------------------
// POST /api/coverage
// ---------------------------------------------------------------------------

/// Start a coverage pass, or join the one already running.
///
/// Answers `202 Accepted` immediately; the pass reports through the
/// stream endpoint.
pub async fn trigger_coverage<P: CatalogProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> Response {
    let trigger = state.coordinator.trigger();
    let status = match trigger {
        CoverageTrigger::Started(_) => "started",
        CoverageTrigger::Joined(_) => "joined",
    };

    let body = serde_json::json!({
        "status": status,
        "runId": trigger.run_id(),
    });

    (StatusCode::ACCEPTED, Json(body)).into_response()
}
