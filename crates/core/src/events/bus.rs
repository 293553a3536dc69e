use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::Notify;

use crate::{
    events::{ContextId, StorageChange},
    queues::Latest1Queue,
    routes::{Route, Routes},
};

/// Per-origin fan-out of storage changes, keyed by storage key.
///
/// A publish reaches every subscriber of the key except those living in the
/// publishing context, mirroring how a browser delivers `storage` events only
/// to the *other* tabs of an origin.
#[derive(Clone, Default)]
pub struct ChangeBus {
    inner: Arc<ChangeBusInner>,
}

#[derive(Default)]
pub struct ChangeBusInner {
    next_subscription_id: AtomicU64,
    next_publish_seq: AtomicU64,
    routes: Mutex<Routes>,
    metrics: BusMetrics,
}

#[derive(Default)]
pub struct BusMetrics {
    pub published_total: AtomicU64,
    pub delivered_total: AtomicU64,
    pub unrouted_publish_total: AtomicU64,
    pub coalesced_total: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusMetricsSnapshot {
    pub published: u64,
    pub delivered: u64,
    pub unrouted: u64,
    pub coalesced: u64,
}

impl BusMetrics {
    pub fn snapshot(&self) -> BusMetricsSnapshot {
        BusMetricsSnapshot {
            published: self.published_total.load(Ordering::Relaxed),
            delivered: self.delivered_total.load(Ordering::Relaxed),
            unrouted: self.unrouted_publish_total.load(Ordering::Relaxed),
            coalesced: self.coalesced_total.load(Ordering::Relaxed),
        }
    }
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, key: &str, context: ContextId) -> Subscription {
        let subscription_id = self
            .inner
            .next_subscription_id
            .fetch_add(1, Ordering::Relaxed);
        let inbox = Arc::new(Latest1Queue::new(Arc::new(Notify::new())));

        self.inner
            .routes
            .lock()
            .expect("ChangeBus routes poisoned")
            .insert(
                key,
                Route {
                    subscription_id,
                    context,
                    inbox: Arc::clone(&inbox),
                    coalesced_total: Arc::clone(&self.inner.metrics.coalesced_total),
                },
            );

        tracing::trace!(key, %context, subscription_id, "storage subscription added");

        Subscription {
            bus: Arc::clone(&self.inner),
            key: key.to_string(),
            subscription_id,
            inbox,
        }
    }

    /// Fans the change out and returns how many subscribers received it.
    pub fn publish(&self, key: &str, new_value: Option<&str>, origin: ContextId) -> usize {
        let seq = self.inner.next_publish_seq.fetch_add(1, Ordering::Relaxed);
        self.inner
            .metrics
            .published_total
            .fetch_add(1, Ordering::Relaxed);

        let table = self.inner.routes.lock().expect("ChangeBus routes poisoned");
        let Some(routes) = table.table.get(key) else {
            self.inner
                .metrics
                .unrouted_publish_total
                .fetch_add(1, Ordering::Relaxed);
            return 0;
        };

        let mut delivered = 0;
        for route in routes.iter().filter(|r| r.context != origin) {
            route.deliver(StorageChange {
                key: key.to_string(),
                new_value: new_value.map(str::to_string),
                origin,
                seq,
            });
            delivered += 1;
        }

        self.inner
            .metrics
            .delivered_total
            .fetch_add(delivered as u64, Ordering::Relaxed);

        delivered
    }

    pub fn subscriber_count(&self, key: &str) -> usize {
        self.inner
            .routes
            .lock()
            .expect("ChangeBus routes poisoned")
            .count(key)
    }

    pub fn metrics(&self) -> BusMetricsSnapshot {
        self.inner.metrics.snapshot()
    }
}

/// Receiving end of one key subscription. Dropping it unsubscribes.
pub struct Subscription {
    bus: Arc<ChangeBusInner>,
    key: String,
    subscription_id: u64,
    inbox: Arc<Latest1Queue<StorageChange>>,
}

impl Subscription {
    pub fn try_recv(&self) -> Option<StorageChange> {
        self.inbox.try_recv()
    }

    pub fn is_pending(&self) -> bool {
        self.inbox.is_pending()
    }

    pub async fn notified(&self) {
        self.inbox.notified().await;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Ok(mut routes) = self.bus.routes.lock() {
            routes.remove(&self.key, self.subscription_id);
        }
    }
}
