//! Server-Sent Events stream of cache updates.
//!
//! Each connection registers a subscriber, receives a `retry` hint and a
//! `: connected` comment, then one `data:` event per broadcast. Connecting
//! also triggers a coverage pass so a fresh client sees the cache fill or
//! revalidate. The subscriber is unregistered when the client goes away
//! and Axum drops the stream.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream, StreamExt};
use showcase_core::{CatalogProvider, CoverageTrigger};
use tracing::info;

use crate::state::AppState;

/// Reconnect delay advertised to clients.
const RETRY_AFTER: Duration = Duration::from_millis(5000);

/// Interval between keep-alive comments on an idle stream.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Handle `GET /api/shows/stream`.
pub async fn shows_stream<P: CatalogProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Register before triggering so the first broadcast of the pass
    // reaches this client.
    let subscription = state.catalog.subscribers().subscribe();
    let trigger = state.coordinator.trigger();

    info!(
        subscriber = %subscription.id(),
        run_id = trigger.run_id(),
        joined = matches!(trigger, CoverageTrigger::Joined(_)),
        subscribers = state.catalog.subscribers().len(),
        "Stream client connected"
    );

    let preamble = Event::default().retry(RETRY_AFTER).comment("connected");

    let updates = stream::unfold(subscription, |mut subscription| async move {
        let payload = subscription.recv().await?;
        Some((Ok(Event::default().data(&*payload)), subscription))
    });

    let events = stream::once(async move { Ok(preamble) }).chain(updates);

    Sse::new(events).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}
