//! Cache statistics tracking

/// Counters for one memoized function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CacheStats {
    hits: u64,
    misses: u64,
    evictions: u64,
    inserts: u64,
}

impl CacheStats {
    /// Create a zeroed tracker
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_insert(&mut self) {
        self.inserts += 1;
    }

    /// Lookups that found an entry
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that ran the wrapped function, failed runs included
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Entries dropped to stay within capacity
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Entries stored after a successful run
    pub fn inserts(&self) -> u64 {
        self.inserts
    }

    /// Total lookups
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Reset all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
