//! crates/hostname/src/barrier.rs
//!
//! Mutual exclusion between in-flight DNS round trips and configuration
//! reloads.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lets DNS round trips hold off a configuration reload.
///
/// Any number of lookups may hold a [`ReloadDeferral`] at once. A reload takes
/// [`ReloadBarrier::exclusive`], which waits until every deferral has been
/// dropped and blocks new ones until the reload is done.
#[derive(Debug, Default)]
pub struct ReloadBarrier {
    lock: RwLock<()>,
}

/// Shared guard held for the duration of a DNS round trip.
#[must_use = "the reload is only deferred while the guard is alive"]
#[derive(Debug)]
pub struct ReloadDeferral<'a> {
    _guard: RwLockReadGuard<'a, ()>,
}

/// Exclusive guard held while a reload replaces the configuration.
#[must_use = "the reload is only exclusive while the guard is alive"]
#[derive(Debug)]
pub struct ReloadExclusive<'a> {
    _guard: RwLockWriteGuard<'a, ()>,
}

impl ReloadBarrier {
    /// Creates an idle barrier.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lock: RwLock::new(()),
        }
    }

    /// Defers reloads until the returned guard is dropped.
    pub fn defer_reload(&self) -> ReloadDeferral<'_> {
        // The lock protects no data, so a poisoned guard is as good as a clean one.
        let guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        ReloadDeferral { _guard: guard }
    }

    /// Waits for every deferral to end and excludes new ones until the
    /// returned guard is dropped.
    pub fn exclusive(&self) -> ReloadExclusive<'_> {
        let guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        ReloadExclusive { _guard: guard }
    }
}
