// End-to-end cache behavior through the public API.

use std::cell::Cell;

use proptest::prelude::*;
use ringmemo::{memoize, MemoOptions, NoopSink};

#[test]
fn square_two_three_two() {
    let calls = Cell::new(0u32);
    let mut square = MemoOptions::new()
        .capacity(2)
        .build(|x: i64| {
            calls.set(calls.get() + 1);
            x * x
        })
        .unwrap();

    let results: Vec<_> = [2, 3, 2].into_iter().map(|x| square.call(x)).collect();

    assert_eq!(results, vec![4, 9, 4]);
    assert_eq!(calls.get(), 2);
    assert_eq!(square.stats().hits(), 1);
    assert_eq!(square.stats().evictions(), 0);
}

#[test]
fn promoted_entry_is_scanned_first() {
    let mut ident = MemoOptions::new().capacity(4).build(|s: &'static str| s).unwrap();
    for s in ["a", "b", "c", "d"] {
        ident.call(s);
    }

    ident.call("b");
    let order: Vec<_> = ident.keys().copied().collect();
    assert_eq!(order, vec!["b", "d", "c", "a"]);
}

#[test]
fn working_set_larger_than_capacity_thrashes() {
    let calls = Cell::new(0u32);
    let mut ident = MemoOptions::new()
        .capacity(3)
        .build(|x: u8| {
            calls.set(calls.get() + 1);
            x
        })
        .unwrap();

    // Cycling through four keys with room for three: LRU always evicts the
    // key that is needed next.
    for _ in 0..3 {
        for x in 0..4 {
            ident.call(x);
        }
    }
    assert_eq!(calls.get(), 12);
    assert_eq!(ident.stats().hits(), 0);
    assert_eq!(ident.stats().evictions(), 9);
}

#[test]
fn slice_arguments_compare_structurally() {
    let calls = Cell::new(0u32);
    let mut sum = memoize(|xs: Vec<i32>| {
        calls.set(calls.get() + 1);
        xs.iter().sum::<i32>()
    });

    assert_eq!(sum.call(vec![1, 2, 3]), 6);
    assert_eq!(sum.call(vec![1, 2, 3]), 6);
    assert_eq!(sum.call(vec![3, 2, 1]), 6);
    assert_eq!(calls.get(), 2);
}

#[test]
fn noop_sink_with_debug_still_counts() {
    let mut ident = MemoOptions::new()
        .debug(true)
        .sink(NoopSink)
        .build(|x: u8| x)
        .unwrap();
    ident.call(1);
    ident.call(1);
    assert!(ident.is_debug());
    assert_eq!(ident.stats().hit_ratio(), 0.5);
}

proptest! {
    /// Property: resident entries never exceed capacity and every miss runs
    /// the function exactly once
    #[test]
    fn prop_bounded_and_counted(
        capacity in 1usize..8,
        calls in prop::collection::vec(0u8..12, 0..200),
    ) {
        let runs = Cell::new(0u64);
        let mut ident = MemoOptions::new()
            .capacity(capacity)
            .build(|x: u8| {
                runs.set(runs.get() + 1);
                x
            })
            .unwrap();

        for x in calls {
            let before = ident.stats();
            let (misses, inserts, evictions) =
                (before.misses(), before.inserts(), before.evictions());
            let len = ident.len();

            prop_assert_eq!(ident.call(x), x);
            prop_assert!(ident.len() <= capacity);

            let after = ident.stats();
            if after.misses() > misses {
                prop_assert_eq!(after.inserts(), inserts + 1);
                prop_assert!(after.evictions() - evictions <= 1);
                prop_assert_eq!(after.evictions() - evictions == 1, len == capacity);
            } else {
                prop_assert_eq!(ident.len(), len);
                prop_assert_eq!(ident.keys().next(), Some(&x));
            }
        }
        prop_assert_eq!(runs.get(), ident.stats().misses());
    }

    /// Property: the result of a cached call always equals a fresh computation
    #[test]
    fn prop_cached_results_match(
        capacity in 1usize..6,
        calls in prop::collection::vec(-20i32..20, 0..100),
    ) {
        let mut cube = MemoOptions::new()
            .capacity(capacity)
            .build(|x: i32| x * x * x)
            .unwrap();
        for x in calls {
            prop_assert_eq!(cube.call(x), x * x * x);
        }
    }
}
