//! Positions on a layer.

use std::fmt;

use crate::ids::LayerId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position on a layer with fractional coordinates.
///
/// Used for the current view center and the home position, which may sit
/// between tiles. Equality is structural.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    /// The layer this position is on.
    pub layer: LayerId,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position; north is `+y`.
    pub y: f64,
}

impl Coordinate {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(layer: LayerId, x: f64, y: f64) -> Self {
        Self { layer, x, y }
    }

    /// Creates a coordinate at the center of a tile.
    #[must_use]
    pub fn at_tile(layer: LayerId, x: i32, y: i32) -> Self {
        Self::new(layer, f64::from(x), f64::from(y))
    }

    /// Returns this coordinate moved by `(dx, dy)` on the same layer.
    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Returns this coordinate moved to another layer, keeping x and y.
    #[must_use]
    pub fn on_layer(self, layer: LayerId) -> Self {
        Self { layer, ..self }
    }

    /// Returns the tile this coordinate falls on.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn tile(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::new(LayerId(0), 0.0, 0.0)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.layer.get(), self.x, self.y)
    }
}
