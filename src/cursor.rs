//! The explicit enumeration protocol: advance, then read the current element.
//!
//! [`Cursor`] is deliberately separate from [`Iterator`]. A cursor can be
//! asked for its current element any number of times, reports misuse as an
//! error instead of returning `None`, and may or may not be restartable. Any
//! cursor can be turned into a plain iterator with
//! [`Cursor::into_iter_items`] once the caller is done caring about that.

use std::iter::{self, FromFn, Fuse};

use crate::error::{Result, StateError};

/// Where a cursor sits relative to its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Produced or reset, but not yet advanced.
    BeforeFirst,
    /// Positioned on an element.
    Valid,
    /// Advanced past the last element.
    Exhausted,
    /// Refused because its container changed underneath it. Terminal.
    Stale,
}

impl CursorState {
    /// The error `current()` reports when the cursor isn't on an element.
    pub(crate) fn refusal(self) -> StateError {
        match self {
            CursorState::BeforeFirst => StateError::BeforeFirst,
            CursorState::Stale => StateError::Stale,
            _ => StateError::Exhausted,
        }
    }
}

/// A stateful cursor over a sequence.
pub trait Cursor {
    /// What `current()` hands out. For container cursors this is a borrow
    /// into the container.
    type Item;

    /// Moves onto the next element, returning whether there is one. Once this
    /// has returned `false` it keeps returning `false`.
    fn advance(&mut self) -> Result<bool>;

    /// The element under the cursor.
    ///
    /// Fails with [`StateError::BeforeFirst`] before the first `advance()`
    /// and with [`StateError::Exhausted`] once `advance()` has returned
    /// `false`.
    fn current(&self) -> Result<Self::Item>;

    /// Puts the cursor back before the first element. Cursors that cannot be
    /// replayed fail with [`StateError::NotRestartable`].
    fn reset(&mut self) -> Result<()> {
        Err(StateError::NotRestartable.into())
    }

    /// The cursor's position relative to the sequence.
    fn state(&self) -> CursorState;

    /// Adapts the cursor into an [`Iterator`] of results. The iterator ends
    /// after the sequence does or after the first error, whichever is first.
    fn into_iter_items(self) -> CursorItems<Self>
    where
        Self: Sized,
    {
        CursorItems {
            cursor: self,
            failed: false,
        }
    }
}

/// Iterator adapter returned by [`Cursor::into_iter_items`].
#[derive(Debug)]
pub struct CursorItems<C> {
    cursor: C,
    failed: bool,
}

impl<C: Cursor> Iterator for CursorItems<C> {
    type Item = Result<C::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let stepped = self
            .cursor
            .advance()
            .and_then(|more| if more { self.cursor.current().map(Some) } else { Ok(None) });

        match stepped {
            Ok(item) => item.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// A lazy, finite, single-pass sequence driven by a closure or any iterator.
///
/// This is the explicit stand-in for a yield-style generator: the state
/// lives in whatever the closure captures, and the only way to replay it is
/// to build a new generator.
pub struct Generator<I: Iterator> {
    source: Fuse<I>,
    current: Option<I::Item>,
    state: CursorState,
}

impl<I: Iterator> Generator<I> {
    /// Wraps anything iterable.
    pub fn new<T>(source: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            source: source.into_iter().fuse(),
            current: None,
            state: CursorState::BeforeFirst,
        }
    }
}

impl<T, F> Generator<FromFn<F>>
where
    F: FnMut() -> Option<T>,
{
    /// Builds a generator that calls `step` for each element until it
    /// returns `None`.
    pub fn from_fn(step: F) -> Self {
        Generator::new(iter::from_fn(step))
    }
}

impl<I> Cursor for Generator<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn advance(&mut self) -> Result<bool> {
        if self.state == CursorState::Exhausted {
            return Ok(false);
        }

        self.current = self.source.next();
        self.state = if self.current.is_some() {
            CursorState::Valid
        } else {
            CursorState::Exhausted
        };

        Ok(self.state == CursorState::Valid)
    }

    fn current(&self) -> Result<Self::Item> {
        match (&self.current, self.state) {
            (Some(item), CursorState::Valid) => Ok(item.clone()),
            (_, state) => Err(state.refusal().into()),
        }
    }

    fn state(&self) -> CursorState {
        self.state
    }
}
