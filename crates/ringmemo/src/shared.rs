//! SharedMemoized: one memoized function behind a mutex
//!
//! Each call holds the lock for its whole lookup, run and store, so the
//! underlying cache still sees one call at a time.

use parking_lot::Mutex;

use crate::memo::Memoized;
use crate::sink::DiagnosticSink;
use crate::stats::CacheStats;
use crate::strategy::{KeyEq, Serializer};

/// Thread-safe handle around a [`Memoized`] function
pub struct SharedMemoized<A, R, F, E, S, D>
where
    S: Serializer<A>,
{
    inner: Mutex<Memoized<A, R, F, E, S, D>>,
}

impl<A, R, F, E, S, D> SharedMemoized<A, R, F, E, S, D>
where
    S: Serializer<A>,
{
    /// Wrap a memoized function
    pub fn new(memo: Memoized<A, R, F, E, S, D>) -> Self {
        Self {
            inner: Mutex::new(memo),
        }
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> CacheStats {
        *self.inner.lock().stats()
    }

    /// Number of resident entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if no entry is resident
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Unwrap the memoized function
    pub fn into_inner(self) -> Memoized<A, R, F, E, S, D> {
        self.inner.into_inner()
    }
}

impl<A, R, F, E, S, D> SharedMemoized<A, R, F, E, S, D>
where
    S: Serializer<A>,
    E: KeyEq<S::Key>,
    D: DiagnosticSink,
{
    /// See [`Memoized::call`]
    pub fn call(&self, args: A) -> R
    where
        F: FnMut(A) -> R,
        R: Clone,
    {
        self.inner.lock().call(args)
    }

    /// See [`Memoized::try_call`]
    pub fn try_call<Er>(&self, args: A) -> Result<R, Er>
    where
        F: FnMut(A) -> Result<R, Er>,
        R: Clone,
    {
        self.inner.lock().try_call(args)
    }
}
