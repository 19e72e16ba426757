//! The sequence capability: anything that can hand out cursors.
//!
//! A container implements [`Sequence`] by describing how to walk itself in
//! terms of opaque positions. The cursors in this module supply the actual
//! traversal, so a container never stores iteration state and any number of
//! cursors can walk it independently.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;

use crate::cursor::{Cursor, CursorState};
use crate::error::{Result, StateError};
use crate::stamp::Stamp;

/// A container capable of producing cursors on demand.
pub trait Sequence {
    /// What a cursor over this container yields.
    type Item<'a>
    where
        Self: 'a;

    /// An opaque location inside the container. Only meaningful for the
    /// container (and version) that produced it.
    type Position: Copy + fmt::Debug;

    /// The number of elements in the container.
    fn len(&self) -> usize;

    /// Whether the container holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identity and modification count of the container.
    fn stamp(&self) -> Stamp;

    /// The position of the first element, if there is one.
    fn first_position(&self) -> Option<Self::Position>;

    /// The position after `position`, if there is one.
    fn next_position(&self, position: Self::Position) -> Option<Self::Position>;

    /// The element at `position`.
    fn item_at(&self, position: Self::Position) -> Option<Self::Item<'_>>;

    /// A cursor that borrows the container. The borrow keeps the container
    /// from being modified while the cursor is alive.
    fn cursor(&self) -> SequenceCursor<'_, Self>
    where
        Self: Sized,
    {
        SequenceCursor::new(self)
    }

    /// A cursor that doesn't borrow the container. It must be handed the
    /// same, unmodified container on every call.
    fn detached_cursor(&self) -> DetachedCursor<Self>
    where
        Self: Sized,
    {
        DetachedCursor::new(self)
    }
}

/// Position and state shared by both cursor flavors.
#[derive(Debug, Clone, Copy)]
struct Walk<P> {
    state: CursorState,
    position: Option<P>,
}

impl<P: Copy> Walk<P> {
    fn new() -> Self {
        Self {
            state: CursorState::BeforeFirst,
            position: None,
        }
    }

    fn advance<S>(&mut self, seq: &S) -> bool
    where
        S: Sequence<Position = P>,
    {
        let next = match (self.state, self.position) {
            (CursorState::BeforeFirst, _) => seq.first_position(),
            (CursorState::Valid, Some(at)) => seq.next_position(at),
            _ => None,
        };

        self.position = next;
        self.state = match next {
            Some(_) => CursorState::Valid,
            None => CursorState::Exhausted,
        };

        next.is_some()
    }

    fn current<'a, S>(&self, seq: &'a S) -> Result<S::Item<'a>>
    where
        S: Sequence<Position = P>,
    {
        match (self.state, self.position) {
            (CursorState::Valid, Some(at)) => {
                seq.item_at(at).ok_or_else(|| StateError::Stale.into())
            }
            (state, _) => Err(state.refusal().into()),
        }
    }
}

/// A cursor holding a shared borrow of its container.
pub struct SequenceCursor<'a, S: Sequence> {
    seq: &'a S,
    walk: Walk<S::Position>,
}

impl<'a, S: Sequence> SequenceCursor<'a, S> {
    pub fn new(seq: &'a S) -> Self {
        Self {
            seq,
            walk: Walk::new(),
        }
    }
}

impl<'a, S: Sequence> Clone for SequenceCursor<'a, S> {
    fn clone(&self) -> Self {
        Self {
            seq: self.seq,
            walk: self.walk,
        }
    }
}

impl<'a, S: Sequence> Cursor for SequenceCursor<'a, S> {
    type Item = S::Item<'a>;

    fn advance(&mut self) -> Result<bool> {
        Ok(self.walk.advance(self.seq))
    }

    fn current(&self) -> Result<Self::Item> {
        self.walk.current(self.seq)
    }

    fn reset(&mut self) -> Result<()> {
        self.walk = Walk::new();
        Ok(())
    }

    fn state(&self) -> CursorState {
        self.walk.state
    }
}

impl<'a, S: Sequence> Iterator for SequenceCursor<'a, S> {
    type Item = S::Item<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.walk.advance(self.seq) {
            self.walk.current(self.seq).ok()
        } else {
            None
        }
    }
}

/// A cursor that remembers which container (and which version of it) it
/// was made from, without borrowing it.
///
/// Every call takes the container explicitly. If the container passed in has
/// been structurally modified since the cursor was made, or is a different
/// container altogether, the call fails with [`StateError::Stale`] and the
/// cursor stays stale.
pub struct DetachedCursor<S: Sequence> {
    stamp: Stamp,
    walk: Walk<S::Position>,
    /// Set by the first refused call; never cleared.
    stale: Cell<bool>,
    seq: PhantomData<fn(&S)>,
}

impl<S: Sequence> DetachedCursor<S> {
    pub fn new(seq: &S) -> Self {
        Self {
            stamp: seq.stamp(),
            walk: Walk::new(),
            stale: Cell::new(false),
            seq: PhantomData,
        }
    }

    fn check(&self, seq: &S) -> Result<()> {
        if !self.stale.get() && seq.stamp() == self.stamp {
            Ok(())
        } else {
            self.stale.set(true);
            log::debug!(
                "refusing stale cursor: made at {:?}, container now at {:?}",
                self.stamp,
                seq.stamp()
            );
            Err(StateError::Stale.into())
        }
    }

    /// See [`Cursor::advance`].
    pub fn advance(&mut self, seq: &S) -> Result<bool> {
        self.check(seq)?;
        Ok(self.walk.advance(seq))
    }

    /// See [`Cursor::current`].
    pub fn current<'a>(&self, seq: &'a S) -> Result<S::Item<'a>> {
        self.check(seq)?;
        self.walk.current(seq)
    }

    /// Restarts the walk. A stale cursor stays stale.
    pub fn reset(&mut self, seq: &S) -> Result<()> {
        self.check(seq)?;
        self.walk = Walk::new();
        Ok(())
    }

    /// [`CursorState::Stale`] once any call has been refused, otherwise
    /// where the walk stands.
    pub fn state(&self) -> CursorState {
        if self.stale.get() {
            CursorState::Stale
        } else {
            self.walk.state
        }
    }
}

impl<S: Sequence> fmt::Debug for DetachedCursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetachedCursor")
            .field("stamp", &self.stamp)
            .field("state", &self.state())
            .field("position", &self.walk.position)
            .finish()
    }
}
