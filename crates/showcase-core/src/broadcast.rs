//! Live subscriber set and best-effort fan-out.
//!
//! Every connected stream client owns one [`ShowSink`] registered here.
//! [`SubscriberRegistry::broadcast`] serializes a [`ShowsUpdate`] once and
//! hands the same JSON text to each sink in registration order. A sink
//! that fails is logged and skipped; it never stops delivery to the rest
//! and never fails the broadcast.
//!
//! Channel-backed subscriptions queue at most [`SUBSCRIBER_CAPACITY`]
//! updates. A subscriber that stops reading misses updates past that point
//! instead of growing its queue.
//!
//! Membership is transient: nothing here is persisted.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use showcase_types::ShowsUpdate;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Updates a channel-backed subscription can hold before further pushes to
/// it fail with [`SinkError::Full`].
pub const SUBSCRIBER_CAPACITY: usize = 64;

/// A sink could not accept a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The receiving side has gone away.
    #[error("sink closed")]
    Closed,

    /// The subscriber is not keeping up and its queue is full.
    #[error("sink full")]
    Full,
}

/// Output end of one subscriber connection.
///
/// `push` must not block: the broadcast runs inline with the coverage
/// pass.
pub trait ShowSink: Send + Sync {
    /// Hand one serialized update to the subscriber.
    fn push(&self, payload: &Arc<str>) -> Result<(), SinkError>;
}

impl ShowSink for mpsc::Sender<Arc<str>> {
    fn push(&self, payload: &Arc<str>) -> Result<(), SinkError> {
        self.try_send(Arc::clone(payload)).map_err(|e| match e {
            TrySendError::Full(_) => SinkError::Full,
            TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}

/// Handle identifying one registration.
///
/// Ids increase with registration order, which is also delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl core::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of one [`SubscriberRegistry::broadcast`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Sinks that accepted the payload.
    pub delivered: usize,
    /// Sinks whose push failed.
    pub failed: usize,
}

#[derive(Default)]
struct RegistryInner {
    next_id: AtomicU64,
    sinks: Mutex<BTreeMap<SubscriberId, Arc<dyn ShowSink>>>,
}

/// The set of live subscribers. Cloning shares the set.
#[derive(Clone, Default)]
pub struct SubscriberRegistry {
    inner: Arc<RegistryInner>,
}

impl SubscriberRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `sink` to the live set.
    ///
    /// The caller wires its own disconnect detection to
    /// [`SubscriberRegistry::unregister`]; [`SubscriberRegistry::subscribe`]
    /// does this automatically.
    pub fn register(&self, sink: Arc<dyn ShowSink>) -> SubscriberId {
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let count = {
            let mut sinks = self.lock();
            sinks.insert(id, sink);
            sinks.len()
        };
        debug!(subscriber = %id, subscribers = count, "Subscriber registered");
        id
    }

    /// Remove a sink. Unknown or already-removed ids are ignored.
    ///
    /// Returns whether a sink was removed.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let (removed, count) = {
            let mut sinks = self.lock();
            let removed = sinks.remove(&id).is_some();
            (removed, sinks.len())
        };
        if removed {
            debug!(subscriber = %id, subscribers = count, "Subscriber unregistered");
        }
        removed
    }

    /// Register a channel-backed sink and return the receiving end.
    ///
    /// The queue holds [`SUBSCRIBER_CAPACITY`] updates. Dropping the returned
    /// [`Subscription`] unregisters it.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CAPACITY);
        let id = self.register(Arc::new(tx));
        Subscription {
            id,
            rx,
            registry: self.clone(),
        }
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no subscriber is connected.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Push `update` to every registered sink.
    ///
    /// Sinks are snapshotted first so a sink registering or leaving
    /// mid-broadcast does not affect this delivery.
    pub fn broadcast(&self, update: &ShowsUpdate) -> Delivery {
        let payload: Arc<str> = match serde_json::to_string(update) {
            Ok(json) => Arc::from(json),
            Err(e) => {
                warn!(error = %e, "Failed to serialize shows update");
                return Delivery::default();
            }
        };

        let sinks: Vec<(SubscriberId, Arc<dyn ShowSink>)> = self
            .lock()
            .iter()
            .map(|(id, sink)| (*id, Arc::clone(sink)))
            .collect();

        let mut delivery = Delivery::default();
        for (id, sink) in sinks {
            match sink.push(&payload) {
                Ok(()) => delivery.delivered = delivery.delivered.saturating_add(1),
                Err(e) => {
                    debug!(subscriber = %id, error = %e, "Skipping subscriber");
                    delivery.failed = delivery.failed.saturating_add(1);
                }
            }
        }
        delivery
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<SubscriberId, Arc<dyn ShowSink>>> {
        // The map is never left half-updated, so a poisoned lock is safe to reuse.
        self.inner.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Receiving end of a channel-backed subscription.
///
/// Unregisters itself from the registry when dropped, which is how a
/// disconnected stream client leaves the live set.
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<Arc<str>>,
    registry: SubscriberRegistry,
}

impl Subscription {
    /// This subscription's registry id.
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next serialized update.
    ///
    /// Returns `None` once the subscription has been unregistered and
    /// every queued update has been received.
    pub async fn recv(&mut self) -> Option<Arc<str>> {
        self.rx.recv().await
    }

    /// Take an already-queued update without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<str>> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}
