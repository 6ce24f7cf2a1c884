//! [`RecordingObserver`] for asserting on reported operations.

use std::sync::Mutex;

use depot_core::{Error, ErrorKind, Operation, StoreEvent, StoreObserver};

/// One call received by a [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Success(StoreEvent),
    Failure {
        operation: Operation,
        candidate: String,
        kind: ErrorKind,
        message: String,
    },
}

/// Observer that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Recorded>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first.
    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<StoreEvent> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Recorded::Success(event) => Some(event),
                Recorded::Failure { .. } => None,
            })
            .collect()
    }

    /// `(operation, candidate, kind)` for every failure.
    pub fn failures(&self) -> Vec<(Operation, String, ErrorKind)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Recorded::Failure {
                    operation,
                    candidate,
                    kind,
                    ..
                } => Some((operation, candidate, kind)),
                Recorded::Success(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl StoreObserver for RecordingObserver {
    fn on_success(&self, event: &StoreEvent) {
        self.events
            .lock()
            .unwrap()
            .push(Recorded::Success(event.clone()));
    }

    fn on_failure(&self, operation: Operation, candidate: &str, error: &Error) {
        self.events.lock().unwrap().push(Recorded::Failure {
            operation,
            candidate: candidate.to_string(),
            kind: error.kind(),
            message: error.to_string(),
        });
    }
}
