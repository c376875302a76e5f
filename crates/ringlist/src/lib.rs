//! # ringlist
//!
//! Circular doubly linked list for recency-ordered stores.
//!
//! ## Architecture
//! - **Arena**: nodes live in a slot vector and link to each other by index,
//!   so the self-referencing single-node and wrap-around cases need no
//!   shared ownership
//! - **Handles**: [`NodeId`] (slot index + allocation stamp) gives O(1)
//!   removal and relinking of any node
//! - **Search**: linear scans from either end with a caller-supplied
//!   equality predicate; the direction decides which duplicate wins
//!
//! ```
//! use ringlist::RingList;
//!
//! let mut ring: RingList<_> = vec![1, 2, 3].into();
//! let two = ring.find_eq(&2).unwrap();
//! ring.move_to_back(two);
//! assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![1, 3, 2]);
//! assert_eq!(ring.shift(), Some(1));
//! ```

#![warn(missing_docs)]

mod arena;
mod error;
mod ring;

pub use arena::NodeId;
pub use error::{InvariantError, Result};
pub use ring::{IntoIter, Iter, RingList};
