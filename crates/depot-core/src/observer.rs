//! Observation of storage operations
//!
//! [`FileStore`](crate::FileStore) reports every operation to an injected
//! [`StoreObserver`] instead of writing to a process-wide logger. The default
//! [`TracingObserver`] forwards to `tracing`.

use std::fmt;

use crate::{Error, FileId};

/// The storage operation being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Open,
    Store,
    Retrieve,
    Exists,
    Delete,
    Stat,
    List,
    Resolve,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Store => "store",
            Self::Retrieve => "retrieve",
            Self::Exists => "exists",
            Self::Delete => "delete",
            Self::Stat => "stat",
            Self::List => "list",
            Self::Resolve => "resolve",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successfully completed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub operation: Operation,
    /// The file involved, when the operation targets a single file
    pub id: Option<FileId>,
    /// Bytes written or read, when known
    pub size_bytes: Option<u64>,
    /// Operation-specific outcome: presence for `exists`, whether anything
    /// was removed for `delete`, entry count for `list`
    pub detail: Option<u64>,
}

impl StoreEvent {
    pub(crate) fn new(operation: Operation) -> Self {
        Self {
            operation,
            id: None,
            size_bytes: None,
            detail: None,
        }
    }

    pub(crate) fn id(mut self, id: FileId) -> Self {
        self.id = Some(id);
        self
    }

    pub(crate) fn size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    pub(crate) fn detail(mut self, detail: u64) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Receives the outcome of every storage operation.
pub trait StoreObserver: Send + Sync + fmt::Debug {
    fn on_success(&self, _event: &StoreEvent) {}

    /// `candidate` is the caller-supplied identifier or path, verbatim.
    fn on_failure(&self, _operation: Operation, _candidate: &str, _error: &Error) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StoreObserver for NoopObserver {}

/// Observer that emits structured `tracing` events.
///
/// Successes are `debug`, rejected client input is `warn` for containment
/// violations and `debug` otherwise, server-side failures are `error`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StoreObserver for TracingObserver {
    fn on_success(&self, event: &StoreEvent) {
        tracing::debug!(
            operation = %event.operation,
            id = event.id.as_ref().map(tracing::field::display),
            size = event.size_bytes,
            detail = event.detail,
            "storage operation succeeded"
        );
    }

    fn on_failure(&self, operation: Operation, candidate: &str, error: &Error) {
        let kind = format!("{:?}", error.kind());
        match error {
            Error::PathEscape { .. } => {
                tracing::warn!(%operation, candidate, error_kind = %kind, "rejected path outside storage root");
            }
            e if e.is_client_error() => {
                tracing::debug!(%operation, candidate, error_kind = %kind, error = %e, "storage operation rejected");
            }
            e => {
                tracing::error!(%operation, candidate, error_kind = %kind, error = %e, "storage operation failed");
            }
        }
    }
}
