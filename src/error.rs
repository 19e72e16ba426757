//! Every way a collection operation can refuse a request.

use thiserror::Error;

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Errors surfaced by the throwing-style half of the collection APIs. Each
/// of these has a try-style counterpart returning `Option` or `bool`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A positional access fell outside `0..len`.
    #[error("index {index} is out of range for a collection of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// An indexed lookup by key missed.
    #[error("the given key was not present in the dictionary")]
    KeyNotFound,

    /// A cursor was misused, went stale, or a container had nothing to give.
    #[error("invalid state: {0}")]
    InvalidState(#[from] StateError),

    /// A linked list node handle was used with a list that does not own it.
    #[error("node ownership violated: {0}")]
    Ownership(#[from] OwnershipError),

    /// A strict add found the key already present.
    #[error("an item with the same key has already been added")]
    DuplicateKey,

    /// A construction parameter was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Why an operation was invalid for the current state of a cursor or
/// container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("cursor has not been advanced onto an element yet")]
    BeforeFirst,

    #[error("cursor has run past the last element")]
    Exhausted,

    #[error("collection was modified after the cursor was created")]
    Stale,

    #[error("this cursor cannot be restarted; request a new one")]
    NotRestartable,

    #[error("collection is empty")]
    Empty,
}

/// Why a node handle was refused by a linked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OwnershipError {
    /// The handle was issued by a different list.
    #[error("node belongs to a different list")]
    Foreign,

    /// The handle's node has been removed from the list.
    #[error("node has been removed from its list")]
    Detached,
}
