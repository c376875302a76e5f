//! Replay results and their text/JSON rendering

use std::fmt::Write;

use ringmemo::{CacheStats, Outcome};
use serde::Serialize;

use crate::workload::Workload;

/// One replayed call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRecord {
    /// Argument passed to the workload
    pub input: i64,
    /// Whether the cache answered
    pub outcome: Outcome,
    /// Result on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    /// Failure message; failed calls are never cached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full replay summary
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Replayed function
    pub workload: Workload,
    /// Configured cache capacity
    pub capacity: usize,
    /// Entries resident after the last call
    pub resident: usize,
    /// Per-call outcomes in order
    pub calls: Vec<CallRecord>,
    /// Final counters
    pub stats: CacheStats,
}

impl Report {
    /// Human-readable rendering, one line per call plus a summary
    pub fn to_text(&self) -> String {
        let name = self.workload.name();
        let mut out = String::new();

        for (i, call) in self.calls.iter().enumerate() {
            let _ = match (&call.value, &call.error) {
                (Some(value), _) => writeln!(
                    out,
                    "call {}: {}({}) = {} [{}]",
                    i + 1,
                    name,
                    call.input,
                    value,
                    call.outcome
                ),
                (None, Some(error)) => writeln!(
                    out,
                    "call {}: {}({}) failed: {} [{}]",
                    i + 1,
                    name,
                    call.input,
                    error,
                    call.outcome
                ),
                (None, None) => Ok(()),
            };
        }

        let _ = writeln!(
            out,
            "calls: {}  hits: {}  misses: {}  evictions: {}  resident: {}/{}  hit ratio: {:.1}%",
            self.calls.len(),
            self.stats.hits(),
            self.stats.misses(),
            self.stats.evictions(),
            self.resident,
            self.capacity,
            self.stats.hit_ratio() * 100.0
        );
        out
    }

    /// Pretty-printed JSON document
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
