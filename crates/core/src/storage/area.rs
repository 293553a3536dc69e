use std::sync::Arc;

use crate::{
    events::{ChangeBus, ContextId, Subscription},
    storage::{MemoryBackend, StorageBackend, StorageError},
};

/// One origin: a durable backend plus the change bus shared by every
/// execution context opened on it.
#[derive(Clone)]
pub struct StorageArea {
    backend: Arc<dyn StorageBackend>,
    bus: ChangeBus,
}

impl StorageArea {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            bus: ChangeBus::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn open_context(&self) -> StorageContext {
        StorageContext {
            id: ContextId::new(),
            area: self.clone(),
        }
    }

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }
}

/// An execution context (a tab, a process) on a [`StorageArea`].
///
/// Successful mutations are announced to the other contexts of the area.
#[derive(Clone)]
pub struct StorageContext {
    id: ContextId,
    area: StorageArea,
}

impl StorageContext {
    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.area.backend.get(key)
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.area.backend.set(key, value)?;
        self.area.bus.publish(key, Some(value), self.id);
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.area.backend.remove(key)?;
        self.area.bus.publish(key, None, self.id);
        Ok(())
    }

    pub fn subscribe(&self, key: &str) -> Subscription {
        self.area.bus.subscribe(key, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_item_notifies_other_contexts_only() {
        let area = StorageArea::in_memory();
        let a = area.open_context();
        let b = area.open_context();
        let sub_a = a.subscribe("k");
        let sub_b = b.subscribe("k");

        a.set_item("k", "1").unwrap();

        assert!(sub_a.try_recv().is_none());
        let change = sub_b.try_recv().unwrap();
        assert_eq!(change.new_value.as_deref(), Some("1"));
        assert_eq!(change.origin, a.id());
        assert_eq!(b.get_item("k").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn remove_item_announces_null_value() {
        let area = StorageArea::in_memory();
        let a = area.open_context();
        let b = area.open_context();
        a.set_item("k", "1").unwrap();
        let sub_b = b.subscribe("k");

        a.remove_item("k").unwrap();

        assert_eq!(sub_b.try_recv().unwrap().new_value, None);
        assert_eq!(a.get_item("k").unwrap(), None);
    }

    #[test]
    fn failed_write_is_not_announced() {
        let backend = Arc::new(MemoryBackend::new());
        let area = StorageArea::new(backend.clone());
        let a = area.open_context();
        let sub_b = area.open_context().subscribe("k");
        backend.set_available(false);

        assert!(a.set_item("k", "1").is_err());
        assert!(sub_b.try_recv().is_none());
    }
}
