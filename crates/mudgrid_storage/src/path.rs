//! Paths: undirected edges between two places.
//!
//! Each end of a path is attached to one exit of its place. A path may
//! connect a place with itself, as long as the two ends use different exits.

use std::fmt;

use mudgrid_foundation::{Direction, PathId, PlaceId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An edge between two places, each end tagged with an exit direction.
///
/// A path is built standalone and then handed to
/// [`World::connect_path`](crate::World::connect_path), which checks exit
/// occupancy on both ends before registering it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    places: [PlaceId; 2],
    exits: [Direction; 2],
}

impl Path {
    /// Creates a path from `a`'s exit `exit_a` to `b`'s exit `exit_b`.
    #[must_use]
    pub fn new(a: PlaceId, exit_a: Direction, b: PlaceId, exit_b: Direction) -> Self {
        Self {
            places: [a, b],
            exits: [exit_a, exit_b],
        }
    }

    /// Returns both endpoints.
    #[must_use]
    pub fn places(&self) -> [PlaceId; 2] {
        self.places
    }

    /// Returns both exit directions, in endpoint order.
    #[must_use]
    pub fn exits(&self) -> &[Direction; 2] {
        &self.exits
    }

    /// Returns true if `place` is one of the endpoints.
    #[must_use]
    pub fn has_place(&self, place: PlaceId) -> bool {
        self.places.contains(&place)
    }

    /// Returns true if both ends attach to the same place.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.places[0] == self.places[1]
    }

    /// Returns the exit `place` uses for this path.
    ///
    /// For a self-loop this is the first end's exit; use
    /// [`Path::exits_of`] to see both.
    #[must_use]
    pub fn exit(&self, place: PlaceId) -> Option<&Direction> {
        self.ends().find(|(p, _)| *p == place).map(|(_, exit)| exit)
    }

    /// Returns every exit of `place` this path occupies.
    pub fn exits_of(&self, place: PlaceId) -> impl Iterator<Item = &Direction> + '_ {
        self.ends()
            .filter(move |(p, _)| *p == place)
            .map(|(_, exit)| exit)
    }

    /// Returns the endpoint opposite `place`.
    ///
    /// For a self-loop this is `place` itself.
    #[must_use]
    pub fn other_place(&self, place: PlaceId) -> Option<PlaceId> {
        if self.places[0] == place {
            Some(self.places[1])
        } else if self.places[1] == place {
            Some(self.places[0])
        } else {
            None
        }
    }

    /// Iterates over `(endpoint, exit)` pairs.
    pub fn ends(&self) -> impl Iterator<Item = (PlaceId, &Direction)> + '_ {
        self.places.iter().copied().zip(self.exits.iter())
    }

    /// Returns this path with each endpoint passed through `map`.
    #[must_use]
    pub fn remap(&self, mut map: impl FnMut(PlaceId) -> PlaceId) -> Self {
        Self {
            places: [map(self.places[0]), map(self.places[1])],
            exits: self.exits.clone(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] <-> {} [{}]",
            self.places[0], self.exits[0], self.places[1], self.exits[1]
        )
    }
}

/// What [`World::connect_path`](crate::World::connect_path) did with a path.
///
/// An occupied exit is an expected outcome when probing for free exits, so
/// it is reported here rather than as an error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum ConnectOutcome {
    /// The path was registered on both endpoints.
    Connected(PathId),
    /// An endpoint already uses the exit; nothing was changed.
    ExitOccupied {
        /// The endpoint whose exit is taken.
        place: PlaceId,
        /// The exit that is taken.
        exit: Direction,
        /// The path already using it.
        by: PathId,
    },
}

impl ConnectOutcome {
    /// Returns true if the path was connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    /// Returns the id of the new path, if it was connected.
    #[must_use]
    pub fn path_id(&self) -> Option<PathId> {
        match self {
            Self::Connected(id) => Some(*id),
            Self::ExitOccupied { .. } => None,
        }
    }
}
