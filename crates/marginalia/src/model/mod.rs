//! Corpus data model: clippings, books and their identifiers.
//!
//! Records live in an arena owned by the [`Corpus`](crate::Corpus); books and
//! sources refer to them by id only.

mod book;
mod clipping;

pub use book::{Book, BookRegistry};
pub use clipping::{Clipping, ClippingDraft, ClippingKind, ClippingState};

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Position of the entity in its arena.
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a parsed clipping. Assigned in corpus-wide ingestion order.
    ClippingId
);

entity_id!(
    /// Identifier of a book, assigned when its (title, author) pair is first seen.
    BookId
);

entity_id!(
    /// Identifier of an ingested upload.
    SourceId
);
