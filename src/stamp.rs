//! Container identity and modification counting.
//!
//! Every container owns a [`Tracker`]. The owner id tells containers apart
//! (a node handle or detached cursor from one list is useless on another),
//! and the version moves forward on every structural change so anything
//! that remembered an older version can tell it is out of date.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Identifies one container instance for its whole life.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
    fn fresh() -> Self {
        OwnerId(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A snapshot of a container's identity and version.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stamp {
    owner: OwnerId,
    version: u64,
}

impl Stamp {
    /// The container this stamp was taken from.
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// How many structural modifications the container had seen.
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Lives inside a container and hands out [`Stamp`]s.
///
/// Cloning a tracker yields a brand new owner: a cloned container is a
/// different container as far as handles and cursors are concerned.
#[derive(Debug)]
pub(crate) struct Tracker {
    owner: OwnerId,
    version: u64,
}

impl Tracker {
    pub(crate) fn new() -> Self {
        Self {
            owner: OwnerId::fresh(),
            version: 0,
        }
    }

    pub(crate) fn owner(&self) -> OwnerId {
        self.owner
    }

    pub(crate) fn stamp(&self) -> Stamp {
        Stamp {
            owner: self.owner,
            version: self.version,
        }
    }

    /// Records a structural modification.
    pub(crate) fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Tracker {
    fn clone(&self) -> Self {
        Self::new()
    }
}
