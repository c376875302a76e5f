//! Slot storage for ring nodes
//!
//! Nodes live in a `Vec` of slots and are linked by slot index. Freed slots
//! are recycled through a free list. Every insertion draws a fresh stamp from
//! a process-wide counter, so a [`NodeId`] keeps identifying exactly one
//! node: once that node is removed (or the ring is cleared) the handle no
//! longer matches any slot, even if the slot is reused.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

/// Handle to a node inside a [`RingList`](crate::RingList).
///
/// Handles are plain values. They never own the node and become stale as
/// soon as the node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    stamp: u64,
}

impl NodeId {
    /// Slot index of the node.
    pub fn index(self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    stamp: u64,
    value: Option<T>,
}

#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn insert(&mut self, value: T) -> NodeId {
        let stamp = NEXT_STAMP.fetch_add(1, Ordering::Relaxed);
        let index = if let Some(index) = self.free_list.pop() {
            self.slots[index] = Slot {
                stamp,
                value: Some(value),
            };
            index
        } else {
            self.slots.push(Slot {
                stamp,
                value: Some(value),
            });
            self.slots.len() - 1
        };
        self.len += 1;
        NodeId { index, stamp }
    }

    /// Frees the slot at `index` and returns its value.
    ///
    /// Panics if the slot is vacant.
    pub(crate) fn remove_at(&mut self, index: usize) -> T {
        let value = self.slots[index]
            .value
            .take()
            .unwrap_or_else(|| panic!("slot {index} is vacant"));
        self.free_list.push(index);
        self.len -= 1;
        value
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index)
            .map(|slot| slot.stamp == id.stamp && slot.value.is_some())
            .unwrap_or(false)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.stamp == id.stamp)
            .and_then(|slot| slot.value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.stamp == id.stamp)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Unchecked-by-stamp lookup used for link traversal.
    pub(crate) fn try_at(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(|slot| slot.value.as_ref())
    }

    /// Panics if the slot is vacant; links only ever point at live slots.
    pub(crate) fn at(&self, index: usize) -> &T {
        self.try_at(index)
            .unwrap_or_else(|| panic!("link to vacant slot {index}"))
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> &mut T {
        self.slots
            .get_mut(index)
            .and_then(|slot| slot.value.as_mut())
            .unwrap_or_else(|| panic!("link to vacant slot {index}"))
    }

    pub(crate) fn id_at(&self, index: usize) -> NodeId {
        NodeId {
            index,
            stamp: self.slots[index].stamp,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of allocated slots, live or free.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn free_count(&self) -> usize {
        self.free_list.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_reused_slot_rejects_old_handle() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        assert_eq!(arena.remove_at(a.index()), 1);

        let b = arena.insert(2);
        assert_eq!(a.index(), b.index());
        assert!(!arena.contains(a));
        assert!(arena.contains(b));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.free_count(), 0);
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut arena = Arena::with_capacity(4);
        let a = arena.insert(1);
        arena.clear();
        let b = arena.insert(2);

        assert_eq!(arena.len(), 1);
        assert_eq!(a.index(), b.index());
        assert!(!arena.contains(a));
        assert_eq!(arena.slot_count(), 1);
    }

    #[test]
    fn test_get_mut_and_id_at() {
        let mut arena = Arena::new();
        let id = arena.insert(10);
        if let Some(value) = arena.get_mut(id) {
            *value = 20;
        }
        assert_eq!(*arena.at(id.index()), 20);
        assert_eq!(arena.id_at(id.index()), id);
    }

    #[test]
    #[should_panic(expected = "vacant")]
    fn test_remove_vacant_panics() {
        let mut arena = Arena::new();
        let id = arena.insert(());
        arena.remove_at(id.index());
        arena.remove_at(id.index());
    }
}
