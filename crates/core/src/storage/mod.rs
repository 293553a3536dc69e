//! Persisted client state.
//!
//! A [`StorageArea`] pairs a durable [`StorageBackend`] with the change bus
//! its execution contexts use to observe each other's writes.
//! [`PersistedState`] is the consumer-facing handle: a typed value that
//! hydrates from the backend, writes through to it, and follows changes made
//! by other contexts.

pub mod area;
pub mod backend;
pub mod diagnostics;
pub mod file;
pub mod memory;
pub mod state;

pub use area::{StorageArea, StorageContext};
pub use backend::{StorageBackend, StorageError};
pub use diagnostics::{
    Diagnostic, DiagnosticKind, DiagnosticSink, MemorySink, Operation, TracingSink,
};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use state::{Next, PersistedState};
