//! Tests for the `TVmaze` client against a local stand-in server.
//!
//! A small Axum app bound to an ephemeral port serves canned payloads in
//! the `TVmaze` shape, so the client is exercised over real HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp, clippy::panic)]

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use showcase_core::config::ProviderConfig;
use showcase_core::{CatalogProvider, ProviderError};
use showcase_server::TvMazeClient;
use tokio::net::TcpListener;

async fn index_page(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("page").map(String::as_str) {
        Some("0") => axum::Json(serde_json::json!([
            {
                "id": 1,
                "name": "Under the Dome",
                "genres": ["Drama", "Science-Fiction", "Thriller"],
                "rating": {"average": 6.5},
                "image": {
                    "medium": "https://static.tvmaze.com/m/1.jpg",
                    "original": "https://static.tvmaze.com/o/1.jpg"
                },
                "summary": "<p>A dome.</p>",
                "language": "English"
            },
            {
                "id": 2,
                "name": "Person of Interest",
                "genres": ["Action", "Crime"],
                "rating": {"average": null},
                "image": null,
                "summary": null
            }
        ]))
        .into_response(),
        Some("1") => (StatusCode::OK, "not json").into_response(),
        _ => (StatusCode::NOT_FOUND, "{\"name\":\"Not Found\"}").into_response(),
    }
}

async fn search_shows(Query(params): Query<HashMap<String, String>>) -> Response {
    let query = params.get("q").cloned().unwrap_or_default();
    axum::Json(serde_json::json!([
        {
            "score": 0.91,
            "show": {"id": 7, "name": query, "genres": ["Comedy"], "rating": {"average": 7.9}}
        }
    ]))
    .into_response()
}

async fn spawn_stand_in() -> SocketAddr {
    let app = Router::new()
        .route("/shows", get(index_page))
        .route("/search/shows", get(search_shows));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn client() -> TvMazeClient {
    let addr = spawn_stand_in().await;
    let config = ProviderConfig {
        base_url: format!("http://{addr}/"),
        request_timeout_ms: 2_000,
    };
    TvMazeClient::new(&config).unwrap()
}

#[tokio::test]
async fn fetch_page_decodes_shows() {
    let client = client().await;

    let shows = client.fetch_page(0).await.unwrap();

    assert_eq!(shows.len(), 2);
    assert_eq!(shows[0].name, "Under the Dome");
    assert!(shows[0].has_genre("Thriller"));
    assert_eq!(shows[0].rating.average, Some(6.5));
    assert_eq!(shows[0].extra["language"], "English");
    assert!(shows[1].image.is_none());
    assert_eq!(shows[1].rating.average, None);
}

#[tokio::test]
async fn fetch_page_past_end_is_status_error() {
    let client = client().await;

    let err = client.fetch_page(5).await.unwrap_err();

    match err {
        ProviderError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Not Found"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_page_bad_body_is_decode_error() {
    let client = client().await;

    let err = client.fetch_page(1).await.unwrap_err();

    assert!(matches!(err, ProviderError::Decode(_)));
}

#[tokio::test]
async fn search_forwards_query_and_decodes_hits() {
    let client = client().await;

    let hits = client.search("girls").await.unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].show.name, "girls");
    assert!((hits[0].score - 0.91).abs() < f64::EPSILON);
}

#[tokio::test]
async fn unreachable_provider_is_request_error() {
    let config = ProviderConfig {
        base_url: String::from("http://127.0.0.1:9"),
        request_timeout_ms: 500,
    };
    let client = TvMazeClient::new(&config).unwrap();

    let err = client.fetch_page(0).await.unwrap_err();

    assert!(matches!(err, ProviderError::Request(_)));
}
