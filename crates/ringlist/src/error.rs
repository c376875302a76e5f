//! Error types for ringlist

use std::fmt;

/// Result type alias for invariant checks
pub type Result<T> = std::result::Result<T, InvariantError>;

/// Structural invariant violated by a [`RingList`](crate::RingList)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// Presence of `head`/`tail` disagrees with the length
    Endpoints {
        /// Live node count
        len: usize,
        /// Whether a head is set
        head: bool,
        /// Whether a tail is set
        tail: bool,
    },

    /// A link points at a vacant slot
    Dangling {
        /// Slot holding the link
        from: usize,
        /// Slot the link points to
        to: usize,
    },

    /// `node.next.prev` or `node.prev.next` does not lead back to the node
    BrokenLink(usize),

    /// Walking `len` links did not close the ring
    NotCircular {
        /// Live node count
        len: usize,
        /// Steps taken before returning to the start
        steps: usize,
    },

    /// The node before `head` is not `tail`
    TailMismatch {
        /// Recorded tail slot
        tail: usize,
        /// Slot found at `head.prev`
        found: usize,
    },

    /// Live and free slots do not add up to the allocated slot count
    SlotAccounting {
        /// Allocated slots
        slots: usize,
        /// Live nodes
        live: usize,
        /// Slots on the free list
        free: usize,
    },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::Endpoints { len, head, tail } => write!(
                f,
                "Endpoint mismatch: len {} with head set = {}, tail set = {}",
                len, head, tail
            ),
            InvariantError::Dangling { from, to } => {
                write!(f, "Dangling link: slot {} points to vacant slot {}", from, to)
            }
            InvariantError::BrokenLink(index) => {
                write!(f, "Broken link: neighbors of slot {} do not point back", index)
            }
            InvariantError::NotCircular { len, steps } => write!(
                f,
                "Ring not circular: expected {} steps to close, took {}",
                len, steps
            ),
            InvariantError::TailMismatch { tail, found } => write!(
                f,
                "Tail mismatch: tail is slot {} but head.prev is slot {}",
                tail, found
            ),
            InvariantError::SlotAccounting { slots, live, free } => write!(
                f,
                "Slot accounting: {} slots != {} live + {} free",
                slots, live, free
            ),
        }
    }
}

impl std::error::Error for InvariantError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_slots() {
        let err = InvariantError::Dangling { from: 3, to: 7 };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('7'));
    }

    #[test]
    fn test_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }
}
