//! Integration tests for search ingestion and the catalog primitives.

#![allow(clippy::unwrap_used)]

mod common;

use common::{ScriptedProvider, catalog, uniform_pages};
use showcase_types::{GenreCounts, SearchHit, Show, ShowId, ShowsCache, ShowsUpdate};

fn hit(show: Show) -> SearchHit {
    SearchHit { score: 0.5, show }
}

#[tokio::test]
async fn ingestion_merges_recounts_and_broadcasts() {
    let (catalog, store) = catalog(ScriptedProvider::new(Vec::new()));

    let mut seeded = ShowsCache::new();
    seeded.merge_page(&[Show::new(1, "Cached", &["Drama"]), Show::new(2, "Also Cached", &["Comedy"])]);
    seeded.pages_fetched = 4;
    store.save_shows(&seeded).await.unwrap();
    // A tally that disagrees with the cache; ingestion must not build on it.
    let stale: GenreCounts = [("Drama", 50_u64)].into_iter().collect();
    store.save_genre_counts(&stale).await.unwrap();

    let mut sub = catalog.subscribers().subscribe();
    let found = vec![Show::new(2, "Renamed", &["Drama"]), Show::new(3, "New", &["Horror", "Drama"])];

    let counts = catalog.ingest_search_results(found.clone()).await.unwrap();

    let cached = store.load_shows().await.unwrap();
    assert_eq!(cached.len(), 3);
    assert_eq!(cached.pages_fetched, 4);
    assert_eq!(cached.get(ShowId(2)).map(|s| s.name.as_str()), Some("Renamed"));

    let expected: GenreCounts = [("Drama", 3_u64), ("Horror", 1)].into_iter().collect();
    assert_eq!(counts, expected);
    assert_eq!(store.load_genre_counts().await.unwrap(), expected);

    let update: ShowsUpdate = serde_json::from_str(&sub.try_recv().unwrap()).unwrap();
    assert_eq!(update.shows, Some(found));
    assert_eq!(update.counts, expected);
    assert!(sub.try_recv().is_none());
}

#[tokio::test]
async fn ingesting_the_same_results_twice_does_not_double_count() {
    let (catalog, _store) = catalog(ScriptedProvider::new(Vec::new()));
    let found = vec![Show::new(7, "Seven", &["Drama", "Drama"])];

    catalog.ingest_search_results(found.clone()).await.unwrap();
    let counts = catalog.ingest_search_results(found).await.unwrap();

    assert_eq!(counts.get("Drama"), 2);
}

#[tokio::test]
async fn search_returns_records_and_ingests_them() {
    let provider = ScriptedProvider::new(Vec::new()).with_hits(vec![
        hit(Show::new(10, "Match One", &["Anime"])),
        hit(Show::new(11, "Match Two", &["Anime", "Comedy"])),
    ]);
    let (catalog, store) = catalog(provider);

    let shows = catalog.search("match").await.unwrap();

    let names: Vec<&str> = shows.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Match One", "Match Two"]);
    assert_eq!(store.load_shows().await.unwrap().len(), 2);
    assert_eq!(store.load_genre_counts().await.unwrap().get("Anime"), 2);
}

#[tokio::test]
async fn empty_search_leaves_cache_untouched() {
    let (catalog, store) = catalog(ScriptedProvider::new(Vec::new()));
    let mut sub = catalog.subscribers().subscribe();

    let shows = catalog.search("nothing").await.unwrap();

    assert!(shows.is_empty());
    assert!(store.load_shows().await.unwrap().is_empty());
    assert!(sub.try_recv().is_none());
}

#[tokio::test]
async fn fetch_and_merge_page_persists_page() {
    let (catalog, store) = catalog(ScriptedProvider::new(uniform_pages(2, 3, &["Drama"])));

    let first = catalog.fetch_and_merge_page(1).await.unwrap();
    let again = catalog.fetch_and_merge_page(1).await.unwrap();

    assert_eq!(first, again);
    assert_eq!(store.load_shows().await.unwrap().len(), 3);
    assert!(catalog.fetch_and_merge_page(5).await.is_err());
    assert_eq!(store.load_shows().await.unwrap().len(), 3);
}
