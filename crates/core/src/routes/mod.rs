use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{
    events::{ContextId, StorageChange},
    queues::Latest1Queue,
};

#[derive(Default)]
pub struct Routes {
    pub table: HashMap<String, Vec<Route>>,
}

pub struct Route {
    pub subscription_id: u64,
    pub context: ContextId,
    pub inbox: Arc<Latest1Queue<StorageChange>>,
    pub coalesced_total: Arc<AtomicU64>,
}

impl Route {
    /// Returns `true` when the delivery replaced a change the subscriber had
    /// not read yet.
    pub fn deliver(&self, change: StorageChange) -> bool {
        let coalesced = self.inbox.set(change).is_some();
        if coalesced {
            self.coalesced_total.fetch_add(1, Ordering::Relaxed);
        }
        coalesced
    }
}

impl Routes {
    pub fn insert(&mut self, key: &str, route: Route) {
        self.table.entry(key.to_string()).or_default().push(route);
    }

    pub fn remove(&mut self, key: &str, subscription_id: u64) -> bool {
        let Some(routes) = self.table.get_mut(key) else {
            return false;
        };

        let before = routes.len();
        routes.retain(|r| r.subscription_id != subscription_id);
        let removed = routes.len() != before;

        if routes.is_empty() {
            self.table.remove(key);
        }

        removed
    }

    pub fn count(&self, key: &str) -> usize {
        self.table.get(key).map(Vec::len).unwrap_or(0)
    }
}
