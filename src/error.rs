use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("container is full, it cannot hold more than {max_size} elements")]
    Overflow { max_size: usize },

    #[error("cursor does not point at an element")]
    OutOfRange,

    #[error("cursor is stale or points past the last element")]
    InvalidCursor,

    #[error("key not found")]
    KeyNotFound,
}

pub type Result<T> = ::core::result::Result<T, Error>;

/// A broken red-black or ordering invariant, reported by [`crate::Redwood::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("root is red")]
    RedRoot,

    #[error("red node at slot {0} has a red child")]
    RedRedEdge(usize),

    #[error("black height differs below slot {0}")]
    BlackHeightMismatch(usize),

    #[error("in-order walk is not sorted at slot {0}")]
    OutOfOrder(usize),

    #[error("child at slot {0} does not point back to its parent")]
    BrokenParentLink(usize),

    #[error("tree reports {reported} elements but {found} are reachable")]
    LengthMismatch { reported: usize, found: usize },

    #[error("sentinel is not the right child of the maximum")]
    MisplacedSentinel,
}
