//! A small family of general-purpose containers which share their ways of
//! being walked and of failing.
//!
//! Every container here implements [`Sequence`], so it can hand out cursors:
//! a borrowing [`SequenceCursor`] which doubles as an `Iterator`, or a
//! [`DetachedCursor`] which notices when the container was structurally
//! modified behind its back and refuses to continue.
//!
//! Most operations come in two flavors. The try-style one answers with an
//! `Option` or a `bool`; the throwing-style one answers with a [`Result`]
//! carrying a [`CollectionError`] that says exactly what went wrong.
//!
//! ```
//! use mysterious_collections::{Dictionary, HashMap, SortedMap};
//!
//! fn fill<D: Dictionary<&'static str, i32>>(d: &mut D) {
//!     d.insert("One", 1);
//!     d.insert("Two", 2);
//!     d.insert("Three", 3);
//! }
//!
//! let mut hashed = HashMap::new();
//! let mut sorted = SortedMap::new();
//! fill(&mut hashed);
//! fill(&mut sorted);
//!
//! assert_eq!(Some(&2), hashed.get("Two"));
//! assert!(sorted.at("Four").is_err());
//! assert_eq!(vec!["One", "Three", "Two"], sorted.keys().copied().collect::<Vec<_>>());
//! ```

pub mod array_list;
pub mod cursor;
pub mod dictionary;
pub mod error;
pub mod hash_map;
pub mod identity_hasher;
pub mod indexed;
pub mod linked_list;
pub mod queue;
pub mod sequence;
pub mod sorted;
pub mod stack;
pub mod stamp;

pub use array_list::ArrayList;
pub use cursor::{Cursor, CursorItems, CursorState, Generator};
pub use dictionary::Dictionary;
pub use error::{CollectionError, OwnershipError, Result, StateError};
pub use hash_map::HashMap;
pub use identity_hasher::{BuildIdentityHasher, IdentityHasher};
pub use indexed::IndexedCollection;
pub use linked_list::{LinkedList, NodeHandle};
pub use queue::RingQueue;
pub use sequence::{DetachedCursor, Sequence, SequenceCursor};
pub use sorted::{SortedList, SortedMap};
pub use stack::ArrayStack;
pub use stamp::{OwnerId, Stamp};
