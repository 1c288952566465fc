//! crates/logging/src/memory.rs
//! In-memory diagnostic collection.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{Diagnostic, DiagnosticSink, Severity};

/// Sink that records every diagnostic in emission order.
///
/// Primarily used by tests to assert that a decision reported the offending
/// value. The sink is shareable between threads.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn events(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        // A panic while holding the lock cannot leave the vector half-written.
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes and returns all recorded diagnostics.
    pub fn drain(&self) -> Vec<Diagnostic> {
        self.events().drain(..).collect()
    }

    /// Returns a copy of the recorded messages without clearing them.
    pub fn messages(&self) -> Vec<String> {
        self.events()
            .iter()
            .map(|event| event.message().to_owned())
            .collect()
    }

    /// Returns the number of recorded diagnostics with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.events()
            .iter()
            .filter(|event| event.severity() == severity)
            .count()
    }

    /// Returns `true` when any recorded message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.events()
            .iter()
            .any(|event| event.message().contains(needle))
    }

    /// Returns `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.events().push(diagnostic);
    }
}
