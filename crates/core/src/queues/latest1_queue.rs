use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

/// Single-slot inbox: a newer value overwrites an unread older one.
pub struct Latest1Queue<T> {
    slot: Mutex<Option<T>>,
    notify: Arc<Notify>,
}

impl<T> Latest1Queue<T> {
    pub fn new(notify: Arc<Notify>) -> Self {
        Self {
            slot: Mutex::new(None),
            notify,
        }
    }

    /// Stores `value`, returning the unread value it replaced.
    pub fn set(&self, value: T) -> Option<T> {
        let replaced = self
            .slot
            .lock()
            .expect("Latest1Queue poisoned")
            .replace(value);
        self.notify.notify_one();
        replaced
    }

    pub fn try_recv(&self) -> Option<T> {
        self.slot.lock().expect("Latest1Queue poisoned").take()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().expect("Latest1Queue poisoned").is_some()
    }

    pub async fn notified(&self) {
        self.notify.notified().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_value_overwrites_unread_one() {
        let q = Latest1Queue::new(Arc::new(Notify::new()));

        assert_eq!(q.set(1), None);
        assert_eq!(q.set(2), Some(1));
        assert!(q.is_pending());
        assert_eq!(q.try_recv(), Some(2));
        assert_eq!(q.try_recv(), None);
        assert!(!q.is_pending());
    }

    #[tokio::test]
    async fn set_wakes_waiter() {
        let q = Arc::new(Latest1Queue::new(Arc::new(Notify::new())));
        let waiter = {
            let q = Arc::clone(&q);
            tokio::spawn(async move {
                q.notified().await;
                q.try_recv()
            })
        };

        q.set("changed");
        assert_eq!(waiter.await.unwrap(), Some("changed"));
    }
}
