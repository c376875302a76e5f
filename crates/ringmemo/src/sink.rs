//! Diagnostic side channel for cache lookups
//!
//! When a cache is built with `debug(true)` every call reports its outcome
//! and the running counters to a [`DiagnosticSink`]. Sinks only observe:
//! nothing they do feeds back into cache state.

use std::fmt;

/// Result of one cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Outcome {
    /// A matching entry was found; the wrapped function did not run
    Hit,
    /// No matching entry; the wrapped function ran
    Miss,
}

impl Outcome {
    /// Lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Hit => "hit",
            Outcome::Miss => "miss",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lookup as reported to a sink
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Name of the memoized function
    pub name: &'a str,
    /// Hit or miss
    pub outcome: Outcome,
    /// Hits so far, this lookup included
    pub hits: u64,
    /// Misses so far, this lookup included
    pub misses: u64,
}

impl Event<'_> {
    /// Hits over total lookups (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Receiver of lookup events
pub trait DiagnosticSink {
    /// Called once per lookup while diagnostics are enabled
    fn record(&self, event: &Event<'_>);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Event<'_>),
{
    fn record(&self, event: &Event<'_>) {
        self(event)
    }
}

/// Emits each event through `tracing` at `DEBUG` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &Event<'_>) {
        tracing::debug!(
            name = event.name,
            outcome = %event.outcome,
            hits = event.hits,
            misses = event.misses,
            hit_ratio = event.hit_ratio(),
            "memo lookup"
        );
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _event: &Event<'_>) {}
}
