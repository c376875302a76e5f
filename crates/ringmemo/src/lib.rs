//! # ringmemo
//!
//! Bounded memoization cache for arbitrary functions.
//!
//! ## Architecture
//! - **Entry store**: a [`ringlist::RingList`] ordered by recency, most
//!   recently used at the tail
//! - **Lookup**: reverse linear scan with a pluggable [`KeyEq`] predicate,
//!   so keys need neither `Hash` nor `Ord`
//! - **Keys**: derived from the call arguments by a [`Serializer`]
//!   (the arguments themselves by default)
//! - **Eviction**: one least-recently-used entry per insertion that pushes
//!   the store past its capacity
//! - **Diagnostics**: optional per-lookup events to a [`DiagnosticSink`],
//!   `tracing` by default
//!
//! ```
//! use ringmemo::MemoOptions;
//!
//! let mut square = MemoOptions::new()
//!     .capacity(2)
//!     .build(|x: u64| x * x)
//!     .unwrap();
//!
//! assert_eq!(square.call(2), 4);
//! assert_eq!(square.call(3), 9);
//! assert_eq!(square.call(2), 4);
//! assert_eq!(square.stats().hits(), 1);
//! ```

#![warn(missing_docs)]

mod error;
mod memo;
mod shared;
mod sink;
mod stats;
mod strategy;

pub use error::{Error, Result};
pub use memo::{memoize, memoize_fallible, Keys, MemoOptions, Memoized, DEFAULT_CAPACITY};
pub use shared::SharedMemoized;
pub use sink::{DiagnosticSink, Event, NoopSink, Outcome, TracingSink};
pub use stats::CacheStats;
pub use strategy::{Identity, KeyEq, Serializer, StrictEq};
