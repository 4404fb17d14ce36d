//! Typed identifiers and per-world id allocation.
//!
//! Every entity kind gets its own newtype so a place id can never be passed
//! where a layer id is expected. Ids are allocated by an [`IdAllocator`]
//! owned by the world, so two worlds never share counter state.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An identifier that can be handed out in ascending order.
pub trait SequentialId: Copy + Ord + fmt::Debug {
    /// The first id an empty allocator hands out.
    fn first() -> Self;

    /// The id following this one, or `None` for the largest id.
    fn successor(self) -> Option<Self>;
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident($repr:ty), $label:literal, $first:expr) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub $repr);

        impl $name {
            /// Creates an id from its raw value.
            #[must_use]
            pub const fn new(raw: $repr) -> Self {
                Self(raw)
            }

            /// Returns the raw value.
            #[must_use]
            pub const fn get(self) -> $repr {
                self.0
            }
        }

        impl SequentialId for $name {
            fn first() -> Self {
                Self($first)
            }

            fn successor(self) -> Option<Self> {
                self.0.checked_add(1).map(Self)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", $label, self.0)
            }
        }

        impl From<$repr> for $name {
            fn from(raw: $repr) -> Self {
                Self(raw)
            }
        }
    };
}

define_id!(
    /// Identifier of a place, unique within a world.
    PlaceId(u32), "place", 1
);
define_id!(
    /// Identifier of a layer (map level).
    LayerId(i32), "layer", 0
);
define_id!(
    /// Identifier of a path, assigned when the path is connected.
    PathId(u64), "path", 0
);
define_id!(
    /// Identifier of a risk level.
    RiskLevelId(u32), "risk level", 0
);
define_id!(
    /// Identifier of an area (place group).
    AreaId(u32), "area", 0
);

/// Hands out ascending ids and keeps track of ids assigned explicitly.
///
/// Explicit ids (for example from a loaded file) are reported through
/// [`IdAllocator::observe`] so later allocations never collide with them.
/// Once the largest id has been handed out the allocator is exhausted:
/// [`IdAllocator::try_allocate`] returns `None` and
/// [`IdAllocator::allocate`] keeps returning the largest id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdAllocator<I: SequentialId> {
    next: I,
    exhausted: bool,
}

impl<I: SequentialId> Default for IdAllocator<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: SequentialId> IdAllocator<I> {
    /// Creates an allocator starting at the id kind's first value.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: I::first(),
            exhausted: false,
        }
    }

    /// Returns the next id.
    ///
    /// An exhausted allocator returns the largest id again, which the world
    /// then rejects as a duplicate.
    pub fn allocate(&mut self) -> I {
        let id = self.next;
        self.advance_past(id);
        id
    }

    /// Returns a fresh id, or `None` if every id has been handed out.
    pub fn try_allocate(&mut self) -> Option<I> {
        if self.exhausted {
            return None;
        }
        Some(self.allocate())
    }

    /// Records an explicitly chosen id.
    pub fn observe(&mut self, id: I) {
        if id >= self.next && !self.exhausted {
            self.advance_past(id);
        }
    }

    /// Returns the id the next call to [`IdAllocator::allocate`] will return.
    #[must_use]
    pub fn peek(&self) -> I {
        self.next
    }

    /// Returns true once the largest id has been handed out or observed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn advance_past(&mut self, id: I) {
        match id.successor() {
            Some(next) => self.next = next,
            None => {
                self.next = id;
                self.exhausted = true;
            }
        }
    }
}
