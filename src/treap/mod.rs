//! Persistent binary search trees where each node also maintains the heap invariant.
//!
//! Trees are immutable. Every operation returns a new root and shares all untouched subtrees with
//! its inputs, so old versions stay valid and cheap to keep around.

mod compare;
mod map;
mod node;
mod set;
pub mod tree;

pub use self::compare::{Comparer, KeyComparer, Natural};
pub use self::map::{PersistentMap, PersistentMapIter};
pub use self::node::Node;
pub use self::set::{PersistentSet, PersistentSetIter};
pub use self::tree::Tree;

use std::error;
use std::fmt;
use std::result;

/// A violation of the treap invariants found by `tree::check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The value at this in-order position is not greater than the value before it.
    Unordered { position: usize },
    /// A child has a higher priority than its parent.
    HeapViolation { parent: u32, child: u32 },
    /// A node caches a subtree length that does not match its children.
    LengthMismatch { expected: usize, actual: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Unordered { position } => {
                write!(f, "value at in-order position {} is out of order", position)
            },
            Error::HeapViolation { parent, child } => write!(
                f,
                "child priority {} exceeds parent priority {}",
                child, parent,
            ),
            Error::LengthMismatch { expected, actual } => write!(
                f,
                "node caches length {} but its subtree has {} values",
                actual, expected,
            ),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
