//! Memoized: a function wrapper backed by a recency-ordered ring
//!
//! Entries are kept in a [`RingList`] with the most recently used entry at
//! the tail. A call scans from the tail, so repeated calls with the same
//! arguments match on the first comparison. On a miss the new entry is
//! pushed at the tail and, once the ring holds more than `capacity`
//! entries, the head (least recently used) is dropped.

use std::any;
use std::borrow::Cow;
use std::fmt;
use std::iter::Rev;
use std::marker::PhantomData;

use ringlist::RingList;

use crate::error::{Error, Result};
use crate::shared::SharedMemoized;
use crate::sink::{DiagnosticSink, Event, Outcome, TracingSink};
use crate::stats::CacheStats;
use crate::strategy::{Identity, KeyEq, Serializer, StrictEq};

/// Default number of resident entries
pub const DEFAULT_CAPACITY: usize = 24;

pub(crate) struct Entry<K, R> {
    key: K,
    result: R,
}

/// Configuration for a memoized function
///
/// Strategy setters change the corresponding type parameter, so closures
/// passed to [`is_equal`](Self::is_equal) and
/// [`serializer`](Self::serializer) need annotated argument types.
///
/// ```
/// use ringmemo::MemoOptions;
///
/// let mut area = MemoOptions::new()
///     .capacity(8)
///     .serializer(|dims: &(u32, u32)| (dims.0.min(dims.1), dims.0.max(dims.1)))
///     .build(|(w, h): (u32, u32)| w * h)
///     .unwrap();
///
/// assert_eq!(area.call((2, 5)), 10);
/// assert_eq!(area.call((5, 2)), 10);
/// assert_eq!(area.stats().hits(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemoOptions<E = StrictEq, S = Identity, D = TracingSink> {
    capacity: usize,
    is_equal: E,
    serializer: S,
    debug: bool,
    sink: D,
    name: Option<Cow<'static, str>>,
}

impl MemoOptions {
    /// Defaults: capacity 24, `==` on keys, arguments as keys, diagnostics
    /// off, events to `tracing` when turned on
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            is_equal: StrictEq,
            serializer: Identity,
            debug: false,
            sink: TracingSink,
            name: None,
        }
    }
}

impl Default for MemoOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, S, D> MemoOptions<E, S, D> {
    /// Maximum number of resident entries
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Report every lookup to the diagnostic sink
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Name used in diagnostics; defaults to the wrapped function's type name
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Key equality predicate
    pub fn is_equal<E2>(self, is_equal: E2) -> MemoOptions<E2, S, D> {
        MemoOptions {
            capacity: self.capacity,
            is_equal,
            serializer: self.serializer,
            debug: self.debug,
            sink: self.sink,
            name: self.name,
        }
    }

    /// Argument-to-key mapping applied before comparison
    pub fn serializer<S2>(self, serializer: S2) -> MemoOptions<E, S2, D> {
        MemoOptions {
            capacity: self.capacity,
            is_equal: self.is_equal,
            serializer,
            debug: self.debug,
            sink: self.sink,
            name: self.name,
        }
    }

    /// Receiver of lookup events when `debug` is on
    pub fn sink<D2>(self, sink: D2) -> MemoOptions<E, S, D2> {
        MemoOptions {
            capacity: self.capacity,
            is_equal: self.is_equal,
            serializer: self.serializer,
            debug: self.debug,
            sink,
            name: self.name,
        }
    }

    /// Wrap an infallible function
    ///
    /// # Errors
    /// [`Error::InvalidCapacity`] if capacity is zero.
    pub fn build<A, R, F>(self, func: F) -> Result<Memoized<A, R, F, E, S, D>>
    where
        F: FnMut(A) -> R,
        S: Serializer<A>,
        E: KeyEq<S::Key>,
        D: DiagnosticSink,
    {
        self.validate()?;
        Ok(self.assemble(func))
    }

    /// Wrap a function returning `Result`; only `Ok` values are cached.
    ///
    /// # Errors
    /// [`Error::InvalidCapacity`] if capacity is zero.
    pub fn build_fallible<A, R, Er, F>(self, func: F) -> Result<Memoized<A, R, F, E, S, D>>
    where
        F: FnMut(A) -> std::result::Result<R, Er>,
        S: Serializer<A>,
        E: KeyEq<S::Key>,
        D: DiagnosticSink,
    {
        self.validate()?;
        Ok(self.assemble(func))
    }

    fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidCapacity(self.capacity));
        }
        Ok(())
    }

    fn assemble<A, R, F>(mut self, func: F) -> Memoized<A, R, F, E, S, D>
    where
        S: Serializer<A>,
    {
        let name = self
            .name
            .take()
            .unwrap_or(Cow::Borrowed(any::type_name::<F>()));
        Memoized {
            func,
            entries: RingList::new(),
            options: self,
            name,
            stats: CacheStats::new(),
            _args: PhantomData,
        }
    }
}

/// Memoize `func` with default options.
///
/// ```
/// let mut square = ringmemo::memoize(|x: i64| x * x);
/// assert_eq!(square.call(3), 9);
/// assert_eq!(square.call(3), 9);
/// assert_eq!(square.stats().misses(), 1);
/// ```
pub fn memoize<A, R, F>(func: F) -> Memoized<A, R, F>
where
    A: Clone + PartialEq,
    F: FnMut(A) -> R,
{
    MemoOptions::new().assemble(func)
}

/// Memoize a fallible `func` with default options; errors are not cached.
pub fn memoize_fallible<A, R, Er, F>(func: F) -> Memoized<A, R, F>
where
    A: Clone + PartialEq,
    F: FnMut(A) -> std::result::Result<R, Er>,
{
    MemoOptions::new().assemble(func)
}

/// A function wrapped with a bounded, recency-ordered result cache
pub struct Memoized<A, R, F, E = StrictEq, S = Identity, D = TracingSink>
where
    S: Serializer<A>,
{
    func: F,
    entries: RingList<Entry<S::Key, R>>,
    options: MemoOptions<E, S, D>,
    name: Cow<'static, str>,
    stats: CacheStats,
    _args: PhantomData<fn(A)>,
}

impl<A, R, F, E, S, D> Memoized<A, R, F, E, S, D>
where
    S: Serializer<A>,
{
    /// Number of resident entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entry is resident
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.options.capacity
    }

    /// Diagnostic name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether lookups are reported to the sink
    pub fn is_debug(&self) -> bool {
        self.options.debug
    }

    /// Hit/miss/eviction counters
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Resident keys from most to least recently used
    pub fn keys(&self) -> Keys<'_, S::Key, R> {
        Keys {
            inner: self.entries.iter().rev(),
        }
    }

    /// Drop every entry and reset statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.reset();
    }

    /// Move into a wrapper callable through `&self` from several threads
    pub fn into_shared(self) -> SharedMemoized<A, R, F, E, S, D> {
        SharedMemoized::new(self)
    }
}

impl<A, R, F, E, S, D> Memoized<A, R, F, E, S, D>
where
    S: Serializer<A>,
    E: KeyEq<S::Key>,
    D: DiagnosticSink,
{
    /// Return the cached result for `args`, running the function on a miss.
    pub fn call(&mut self, args: A) -> R
    where
        F: FnMut(A) -> R,
        R: Clone,
    {
        let key = self.options.serializer.serialize(&args);
        if let Some(result) = self.lookup(&key) {
            return result;
        }
        let result = (self.func)(args);
        self.store(key, result.clone());
        result
    }

    /// Like [`call`](Self::call) for functions returning `Result`.
    ///
    /// An `Err` is returned unchanged and leaves no entry behind, so the
    /// next call with the same arguments runs the function again.
    pub fn try_call<Er>(&mut self, args: A) -> std::result::Result<R, Er>
    where
        F: FnMut(A) -> std::result::Result<R, Er>,
        R: Clone,
    {
        let key = self.options.serializer.serialize(&args);
        if let Some(result) = self.lookup(&key) {
            return Ok(result);
        }
        let result = (self.func)(args)?;
        self.store(key, result.clone());
        Ok(result)
    }

    /// Cached result for `args` without running the function, promoting the
    /// entry or touching statistics.
    pub fn peek(&self, args: &A) -> Option<&R> {
        let key = self.options.serializer.serialize(args);
        let is_equal = &self.options.is_equal;
        let id = self
            .entries
            .find_reverse(&key, |entry, candidate| is_equal.key_eq(&entry.key, candidate))?;
        self.entries.get(id).map(|entry| &entry.result)
    }

    fn lookup(&mut self, key: &S::Key) -> Option<R>
    where
        R: Clone,
    {
        if self.entries.is_empty() {
            self.record(Outcome::Miss);
            return None;
        }

        let is_equal = &self.options.is_equal;
        let found = self
            .entries
            .find_reverse(key, |entry, candidate| is_equal.key_eq(&entry.key, candidate));

        match found {
            Some(id) => {
                self.entries.move_to_back(id);
                self.record(Outcome::Hit);
                self.entries.get(id).map(|entry| entry.result.clone())
            }
            None => {
                self.record(Outcome::Miss);
                None
            }
        }
    }

    fn store(&mut self, key: S::Key, result: R) {
        self.entries.push(Entry { key, result });
        self.stats.record_insert();

        if self.entries.len() > self.options.capacity && self.entries.shift().is_some() {
            self.stats.record_eviction();
            tracing::trace!(
                name = %self.name,
                capacity = self.options.capacity,
                "evicted least recently used entry"
            );
        }
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Hit => self.stats.record_hit(),
            Outcome::Miss => self.stats.record_miss(),
        }
        if self.options.debug {
            self.options.sink.record(&Event {
                name: &self.name,
                outcome,
                hits: self.stats.hits(),
                misses: self.stats.misses(),
            });
        }
    }
}

impl<A, R, F, E, S, D> fmt::Debug for Memoized<A, R, F, E, S, D>
where
    S: Serializer<A>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("name", &self.name)
            .field("capacity", &self.options.capacity)
            .field("len", &self.entries.len())
            .field("debug", &self.options.debug)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Iterator over resident keys, most recently used first
pub struct Keys<'a, K, R> {
    inner: Rev<ringlist::Iter<'a, Entry<K, R>>>,
}

impl<'a, K, R> Iterator for Keys<'a, K, R> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| &entry.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, R> ExactSizeIterator for Keys<'_, K, R> {}
