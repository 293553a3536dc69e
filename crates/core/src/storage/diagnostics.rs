use std::{fmt, sync::Mutex};

use crate::storage::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    BackendUnavailable,
    QuotaExceeded,
    Serialize,
    Deserialize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
    Remove,
}

/// A swallowed persistence failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub key: String,
    pub kind: DiagnosticKind,
    pub operation: Operation,
    pub message: String,
}

impl From<&StorageError> for DiagnosticKind {
    fn from(err: &StorageError) -> Self {
        match err {
            StorageError::QuotaExceeded { .. } => DiagnosticKind::QuotaExceeded,
            StorageError::Corrupt { .. } => DiagnosticKind::Deserialize,
            StorageError::Unavailable { .. } | StorageError::Io(_) => {
                DiagnosticKind::BackendUnavailable
            }
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::BackendUnavailable => "backend_unavailable",
            DiagnosticKind::QuotaExceeded => "quota_exceeded",
            DiagnosticKind::Serialize => "serialize",
            DiagnosticKind::Deserialize => "deserialize",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Remove => "remove",
        };
        f.write_str(name)
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` subscriber as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        tracing::warn!(
            key = %diagnostic.key,
            kind = %diagnostic.kind,
            operation = %diagnostic.operation,
            "{}",
            diagnostic.message
        );
    }
}

/// Keeps every diagnostic in memory so tests can assert on them.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().expect("MemorySink poisoned").clone()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.lock().expect("MemorySink poisoned"))
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().expect("MemorySink poisoned").is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.records
            .lock()
            .expect("MemorySink poisoned")
            .push(diagnostic);
    }
}
