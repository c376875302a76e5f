//! Circular doubly linked list
//!
//! ```text
//!          ┌──────────────────────── prev ───────────────────────┐
//!          ▼                                                     │
//!   head ─► [A] ◄──► [B] ◄──► [C] ◄──► ... ◄──► [Z] ◄── tail     │
//!          │                                     ▲               │
//!          └──────────────────────── next ───────┘───────────────┘
//! ```
//!
//! `tail.next` is `head` and `head.prev` is `tail`. A single node links to
//! itself in both directions. An empty ring has neither head nor tail.

use std::fmt;
use std::iter::FusedIterator;

use crate::arena::{Arena, NodeId};
use crate::error::{InvariantError, Result};

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: usize,
    next: usize,
}

/// Circular doubly linked list with O(1) insertion and removal at both ends
/// and at any node given its [`NodeId`].
///
/// Passing a handle that does not belong to the ring (removed, cleared, or
/// issued by an unrelated ring) to a handle-taking method is a caller bug
/// and panics. A clone of a ring accepts the handles of its source.
#[derive(Clone)]
pub struct RingList<T> {
    arena: Arena<Node<T>>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<T> RingList<T> {
    /// Create an empty ring
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            head: None,
            tail: None,
        }
    }

    /// Create an empty ring with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Check if the ring is empty
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Handle of the head node
    pub fn head(&self) -> Option<NodeId> {
        self.head.map(|idx| self.arena.id_at(idx))
    }

    /// Handle of the tail node
    pub fn tail(&self) -> Option<NodeId> {
        self.tail.map(|idx| self.arena.id_at(idx))
    }

    /// Value at the head
    pub fn front(&self) -> Option<&T> {
        self.head.map(|idx| &self.arena.at(idx).value)
    }

    /// Value at the tail
    pub fn back(&self) -> Option<&T> {
        self.tail.map(|idx| &self.arena.at(idx).value)
    }

    /// Returns `true` if `id` refers to a live node of this ring.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    /// Value of a node, if the handle is live
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    /// Mutable value of a node, if the handle is live
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Handle of the node after `id`, wrapping from tail to head.
    pub fn next_of(&self, id: NodeId) -> NodeId {
        let idx = self.expect_member(id);
        self.arena.id_at(self.arena.at(idx).next)
    }

    /// Handle of the node before `id`, wrapping from head to tail.
    pub fn prev_of(&self, id: NodeId) -> NodeId {
        let idx = self.expect_member(id);
        self.arena.id_at(self.arena.at(idx).prev)
    }

    /// Insert `value` as the new tail. O(1).
    pub fn push(&mut self, value: T) -> NodeId {
        match (self.tail, self.head) {
            (Some(tail), Some(head)) => {
                let idx = self.link_between(value, tail, head);
                self.tail = Some(idx);
                self.arena.id_at(idx)
            }
            _ => self.link_first(value),
        }
    }

    /// Insert `value` as the new head. O(1).
    pub fn unshift(&mut self, value: T) -> NodeId {
        match (self.tail, self.head) {
            (Some(tail), Some(head)) => {
                let idx = self.link_between(value, tail, head);
                self.head = Some(idx);
                self.arena.id_at(idx)
            }
            _ => self.link_first(value),
        }
    }

    /// Insert `value` right after `id`; becomes the tail if `id` was.
    ///
    /// # Panics
    /// If `id` is not a live node of this ring.
    pub fn insert_after(&mut self, id: NodeId, value: T) -> NodeId {
        let at = self.expect_member(id);
        let next = self.arena.at(at).next;
        let idx = self.link_between(value, at, next);
        if self.tail == Some(at) {
            self.tail = Some(idx);
        }
        self.arena.id_at(idx)
    }

    /// Insert `value` right before `id`; becomes the head if `id` was.
    ///
    /// # Panics
    /// If `id` is not a live node of this ring.
    pub fn insert_before(&mut self, id: NodeId, value: T) -> NodeId {
        let at = self.expect_member(id);
        let prev = self.arena.at(at).prev;
        let idx = self.link_between(value, prev, at);
        if self.head == Some(at) {
            self.head = Some(idx);
        }
        self.arena.id_at(idx)
    }

    /// Remove and return the tail value
    pub fn pop(&mut self) -> Option<T> {
        let tail = self.tail?;
        Some(self.unlink(tail))
    }

    /// Remove and return the head value
    pub fn shift(&mut self) -> Option<T> {
        let head = self.head?;
        Some(self.unlink(head))
    }

    /// Remove the node `id` and return its value. O(1).
    ///
    /// # Panics
    /// If `id` is not a live node of this ring.
    pub fn delete(&mut self, id: NodeId) -> T {
        let idx = self.expect_member(id);
        self.unlink(idx)
    }

    /// Relink `id` as the tail. The handle stays valid.
    ///
    /// # Panics
    /// If `id` is not a live node of this ring.
    pub fn move_to_back(&mut self, id: NodeId) {
        let idx = self.expect_member(id);
        if self.tail == Some(idx) {
            return;
        }
        if self.head == Some(idx) {
            // tail.next is already head: rotating by one is enough
            self.head = Some(self.arena.at(idx).next);
            self.tail = Some(idx);
            return;
        }
        let (Some(head), Some(tail)) = (self.head, self.tail) else {
            return;
        };
        self.detach(idx);
        self.attach_between(idx, tail, head);
        self.tail = Some(idx);
    }

    /// Relink `id` as the head. The handle stays valid.
    ///
    /// # Panics
    /// If `id` is not a live node of this ring.
    pub fn move_to_front(&mut self, id: NodeId) {
        let idx = self.expect_member(id);
        if self.head == Some(idx) {
            return;
        }
        if self.tail == Some(idx) {
            self.tail = Some(self.arena.at(idx).prev);
            self.head = Some(idx);
            return;
        }
        let (Some(head), Some(tail)) = (self.head, self.tail) else {
            return;
        };
        self.detach(idx);
        self.attach_between(idx, tail, head);
        self.head = Some(idx);
    }

    /// Remove every node. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Scan from head to tail; returns the first node where
    /// `is_equal(node_value, value)` holds.
    ///
    /// With several matches this yields the one closest to the head.
    pub fn find<Q, F>(&self, value: &Q, mut is_equal: F) -> Option<NodeId>
    where
        Q: ?Sized,
        F: FnMut(&T, &Q) -> bool,
    {
        let start = self.head?;
        let mut cur = start;
        loop {
            let node = self.arena.at(cur);
            if is_equal(&node.value, value) {
                return Some(self.arena.id_at(cur));
            }
            cur = node.next;
            if cur == start {
                return None;
            }
        }
    }

    /// Scan from tail to head; returns the first node where
    /// `is_equal(node_value, value)` holds.
    ///
    /// With several matches this yields the one closest to the tail.
    pub fn find_reverse<Q, F>(&self, value: &Q, mut is_equal: F) -> Option<NodeId>
    where
        Q: ?Sized,
        F: FnMut(&T, &Q) -> bool,
    {
        let start = self.tail?;
        let mut cur = start;
        loop {
            let node = self.arena.at(cur);
            if is_equal(&node.value, value) {
                return Some(self.arena.id_at(cur));
            }
            cur = node.prev;
            if cur == start {
                return None;
            }
        }
    }

    /// [`find`](Self::find) with `==` as the predicate
    pub fn find_eq<Q>(&self, value: &Q) -> Option<NodeId>
    where
        Q: ?Sized,
        T: PartialEq<Q>,
    {
        self.find(value, |a, b| a == b)
    }

    /// [`find_reverse`](Self::find_reverse) with `==` as the predicate
    pub fn find_reverse_eq<Q>(&self, value: &Q) -> Option<NodeId>
    where
        Q: ?Sized,
        T: PartialEq<Q>,
    {
        self.find_reverse(value, |a, b| a == b)
    }

    /// Visit values from head to tail until `f` returns `false`.
    ///
    /// # Panics
    /// If the ring is empty. Check [`is_empty`](Self::is_empty) first, or use
    /// [`iter`](Self::iter) which has no such requirement.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        assert!(!self.is_empty(), "for_each called on an empty ring");
        for value in self.iter() {
            if !f(value) {
                break;
            }
        }
    }

    /// Build a new ring of the same length by applying `f` in traversal
    /// order. An empty ring maps to an empty ring.
    pub fn map<U, F>(&self, mut f: F) -> RingList<U>
    where
        F: FnMut(&T) -> U,
    {
        if self.is_empty() {
            return RingList::new();
        }
        let mut out = RingList::with_capacity(self.len());
        self.for_each(|value| {
            out.push(f(value));
            true
        });
        out
    }

    /// Iterate from head to tail. Reverse with `.rev()`.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head.unwrap_or(0),
            back: self.tail.unwrap_or(0),
            remaining: self.len(),
        }
    }

    /// Verify circularity, endpoint consistency and slot accounting.
    pub fn check_invariants(&self) -> Result<()> {
        let len = self.len();
        let (head, tail) = match (self.head, self.tail) {
            (None, None) if len == 0 => return self.check_slots(),
            (Some(head), Some(tail)) if len > 0 => (head, tail),
            (head, tail) => {
                return Err(InvariantError::Endpoints {
                    len,
                    head: head.is_some(),
                    tail: tail.is_some(),
                })
            }
        };

        let found = self.node_checked(head, head)?.prev;
        if found != tail {
            return Err(InvariantError::TailMismatch { tail, found });
        }

        let forward = self.walk(head, len, |node| node.next)?;
        if forward != len {
            return Err(InvariantError::NotCircular {
                len,
                steps: forward,
            });
        }
        let backward = self.walk(tail, len, |node| node.prev)?;
        if backward != len {
            return Err(InvariantError::NotCircular {
                len,
                steps: backward,
            });
        }

        self.check_slots()
    }

    fn check_slots(&self) -> Result<()> {
        let slots = self.arena.slot_count();
        let live = self.arena.len();
        let free = self.arena.free_count();
        if slots != live + free {
            return Err(InvariantError::SlotAccounting { slots, live, free });
        }
        Ok(())
    }

    /// Follow `step` from `start` until it returns, checking both links of
    /// every node on the way. Gives up after `limit + 1` steps.
    fn walk<F>(&self, start: usize, limit: usize, step: F) -> Result<usize>
    where
        F: Fn(&Node<T>) -> usize,
    {
        let mut cur = start;
        let mut steps = 0;
        loop {
            let node = self.node_checked(cur, cur)?;
            let next = self.node_checked(cur, node.next)?;
            let prev = self.node_checked(cur, node.prev)?;
            if next.prev != cur || prev.next != cur {
                return Err(InvariantError::BrokenLink(cur));
            }
            cur = step(node);
            steps += 1;
            if cur == start || steps > limit {
                return Ok(steps);
            }
        }
    }

    fn node_checked(&self, from: usize, index: usize) -> Result<&Node<T>> {
        self.arena
            .try_at(index)
            .ok_or(InvariantError::Dangling { from, to: index })
    }

    fn expect_member(&self, id: NodeId) -> usize {
        assert!(
            self.arena.contains(id),
            "node {:?} is not a member of this ring",
            id
        );
        id.index()
    }

    fn link_first(&mut self, value: T) -> NodeId {
        let id = self.arena.insert(Node {
            value,
            prev: 0,
            next: 0,
        });
        let idx = id.index();
        let node = self.arena.at_mut(idx);
        node.prev = idx;
        node.next = idx;
        self.head = Some(idx);
        self.tail = Some(idx);
        id
    }

    fn link_between(&mut self, value: T, prev: usize, next: usize) -> usize {
        let idx = self.arena.insert(Node { value, prev, next }).index();
        self.arena.at_mut(prev).next = idx;
        self.arena.at_mut(next).prev = idx;
        idx
    }

    fn attach_between(&mut self, idx: usize, prev: usize, next: usize) {
        let node = self.arena.at_mut(idx);
        node.prev = prev;
        node.next = next;
        self.arena.at_mut(prev).next = idx;
        self.arena.at_mut(next).prev = idx;
    }

    /// Splice `idx` out of the ring without freeing it or touching endpoints.
    fn detach(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.arena.at(idx);
            (node.prev, node.next)
        };
        self.arena.at_mut(prev).next = next;
        self.arena.at_mut(next).prev = prev;
    }

    fn unlink(&mut self, idx: usize) -> T {
        if self.len() == 1 {
            self.head = None;
            self.tail = None;
        } else {
            let (prev, next) = {
                let node = self.arena.at(idx);
                (node.prev, node.next)
            };
            self.detach(idx);
            if self.head == Some(idx) {
                self.head = Some(next);
            }
            if self.tail == Some(idx) {
                self.tail = Some(prev);
            }
        }
        self.arena.remove_at(idx).value
    }
}

impl<T> Default for RingList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for RingList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for RingList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RingList<T> {}

impl<T> FromIterator<T> for RingList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = RingList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for RingList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> From<Vec<T>> for RingList<T> {
    fn from(values: Vec<T>) -> Self {
        let mut list = RingList::with_capacity(values.len());
        list.extend(values);
        list
    }
}

/// Borrowing iterator over a [`RingList`], head to tail
pub struct Iter<'a, T> {
    list: &'a RingList<T>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let node = list.arena.at(self.front);
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let node = list.arena.at(self.back);
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a RingList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over a [`RingList`], head to tail
pub struct IntoIter<T> {
    list: RingList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.shift()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for RingList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}
