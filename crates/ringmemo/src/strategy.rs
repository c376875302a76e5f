//! Key derivation and key equality strategies
//!
//! Both are plain traits with blanket impls for closures, so a cache can be
//! configured with either a named strategy type or an inline function:
//!
//! ```
//! use ringmemo::{KeyEq, Serializer};
//!
//! let by_len = |a: &String, b: &String| a.len() == b.len();
//! assert!(by_len.key_eq(&"abc".to_string(), &"xyz".to_string()));
//!
//! let lower = |s: &String| s.to_lowercase();
//! assert_eq!(lower.serialize(&"MiXeD".to_string()), "mixed");
//! ```

/// Decides whether a cached key matches a candidate key.
///
/// Implementations must be pure and symmetric.
pub trait KeyEq<K: ?Sized> {
    /// Compare the key stored in the cache with the key of the current call
    fn key_eq(&self, cached: &K, candidate: &K) -> bool;
}

/// Default key equality: the key type's own `==`.
///
/// For tuples, slices and `Vec`s this compares element by element.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictEq;

impl<K: PartialEq + ?Sized> KeyEq<K> for StrictEq {
    fn key_eq(&self, cached: &K, candidate: &K) -> bool {
        cached == candidate
    }
}

impl<K: ?Sized, F> KeyEq<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    fn key_eq(&self, cached: &K, candidate: &K) -> bool {
        self(cached, candidate)
    }
}

/// Maps call arguments to the key that is stored and compared.
pub trait Serializer<A> {
    /// Key type kept in cache entries
    type Key;

    /// Derive the key for one call
    fn serialize(&self, args: &A) -> Self::Key;
}

/// Default serializer: the key is a clone of the arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<A: Clone> Serializer<A> for Identity {
    type Key = A;

    fn serialize(&self, args: &A) -> A {
        args.clone()
    }
}

impl<A, K, F> Serializer<A> for F
where
    F: Fn(&A) -> K,
{
    type Key = K;

    fn serialize(&self, args: &A) -> K {
        self(args)
    }
}
