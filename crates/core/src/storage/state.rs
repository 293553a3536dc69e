use std::sync::{Arc, Mutex};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    events::Subscription,
    storage::{Diagnostic, DiagnosticKind, DiagnosticSink, Operation, StorageContext},
};

/// New value for a [`PersistedState`]: either a literal or a function of the
/// previous value.
pub enum Next<'a, T> {
    Value(T),
    Update(Box<dyn FnOnce(&T) -> T + 'a>),
}

impl<T> Next<'_, T> {
    fn resolve(self, previous: &T) -> T {
        match self {
            Next::Value(value) => value,
            Next::Update(f) => f(previous),
        }
    }
}

impl<T> From<T> for Next<'_, T> {
    fn from(value: T) -> Self {
        Next::Value(value)
    }
}

/// A value of type `T` kept in memory and mirrored under `key` in the
/// durable backend of a [`StorageContext`].
///
/// Persistence is best effort. Backend and codec failures never reach the
/// caller: reads fall back to the default, writes keep the in-memory update,
/// and each failure is reported once to the [`DiagnosticSink`].
///
/// Writes made by other contexts on the same key arrive through the change
/// bus and replace the in-memory value the next time this state is read or
/// written (or [`poll_external`](Self::poll_external) is called). The last
/// write observed wins.
pub struct PersistedState<T> {
    key: String,
    default: T,
    value: Mutex<T>,
    context: StorageContext,
    subscription: Subscription,
    sink: Arc<dyn DiagnosticSink>,
}

impl<T> PersistedState<T>
where
    T: Serialize + DeserializeOwned + Clone + Send,
{
    pub fn new(
        context: &StorageContext,
        key: impl Into<String>,
        default: T,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let key = key.into();
        // subscribe before hydrating so a write racing the read is not lost
        let subscription = context.subscribe(&key);
        let initial = read_initial(context, &key, &default, sink.as_ref());

        Self {
            key,
            default,
            value: Mutex::new(initial),
            context: context.clone(),
            subscription,
            sink,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current value, after applying any delivered external change.
    pub fn get(&self) -> T {
        let mut current = self.lock();
        self.apply_external(&mut current);
        current.clone()
    }

    pub fn set(&self, value: T) {
        self.write(Next::Value(value));
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.write(Next::Update(Box::new(f)));
    }

    /// Updates the in-memory value, then tries to persist it.
    ///
    /// An external change already delivered is applied first, so an updater
    /// sees the latest value this context has observed.
    pub fn write<'a>(&self, next: impl Into<Next<'a, T>>) {
        let next_value = {
            let mut current = self.lock();
            self.apply_external(&mut current);
            let next_value = next.into().resolve(&current);
            *current = next_value.clone();
            next_value
        };

        self.persist(&next_value);
    }

    /// Deletes the key from the backend and resets to the default.
    pub fn remove(&self) {
        {
            let mut current = self.lock();
            let _ = self.subscription.try_recv();
            *current = self.default.clone();
        }

        if let Err(e) = self.context.remove_item(&self.key) {
            self.report((&e).into(), Operation::Remove, e.to_string());
        }
    }

    /// Applies a delivered external change; returns whether the value changed.
    pub fn poll_external(&self) -> bool {
        let mut current = self.lock();
        self.apply_external(&mut current)
    }

    /// Resolves once another context's change to this key is waiting to be
    /// applied. Returns at once if one already is.
    pub async fn changed(&self) {
        // a wakeup can outlive the change it announced, once get/write took it
        while !self.subscription.is_pending() {
            self.subscription.notified().await;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, T> {
        self.value.lock().expect("PersistedState poisoned")
    }

    fn apply_external(&self, current: &mut T) -> bool {
        let Some(change) = self.subscription.try_recv() else {
            return false;
        };
        let Some(raw) = change.new_value else {
            return false;
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                *current = value;
                true
            }
            Err(e) => {
                tracing::trace!(
                    key = %self.key,
                    origin = %change.origin,
                    seq = change.seq,
                    error = %e,
                    "ignoring malformed storage change"
                );
                false
            }
        }
    }

    fn persist(&self, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                self.report(DiagnosticKind::Serialize, Operation::Write, e.to_string());
                return;
            }
        };

        if let Err(e) = self.context.set_item(&self.key, &encoded) {
            self.report((&e).into(), Operation::Write, e.to_string());
        }
    }

    fn report(&self, kind: DiagnosticKind, operation: Operation, message: String) {
        self.sink.emit(Diagnostic {
            key: self.key.clone(),
            kind,
            operation,
            message,
        });
    }
}

fn read_initial<T>(
    context: &StorageContext,
    key: &str,
    default: &T,
    sink: &dyn DiagnosticSink,
) -> T
where
    T: DeserializeOwned + Clone,
{
    let report = |kind: DiagnosticKind, message: String| {
        sink.emit(Diagnostic {
            key: key.to_string(),
            kind,
            operation: Operation::Read,
            message,
        })
    };

    match context.get_item(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                report(DiagnosticKind::Deserialize, e.to_string());
                default.clone()
            }
        },
        Ok(None) => default.clone(),
        Err(e) => {
            report((&e).into(), e.to_string());
            default.clone()
        }
    }
}
