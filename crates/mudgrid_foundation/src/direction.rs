//! Exit direction labels.
//!
//! A path attaches to a place on one of its exits. The compass directions,
//! up/down and the "unknown" exit `-` are predefined; any other non-empty
//! label is kept as a custom direction. Labels only enter through
//! [`Direction::parse`], so one exit always has exactly one spelling.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The label of an exit on a place.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub enum Direction {
    /// North (`n`).
    North,
    /// Northeast (`ne`).
    NorthEast,
    /// East (`e`).
    East,
    /// Southeast (`se`).
    SouthEast,
    /// South (`s`).
    South,
    /// Southwest (`sw`).
    SouthWest,
    /// West (`w`).
    West,
    /// Northwest (`nw`).
    NorthWest,
    /// Up (`u`).
    Up,
    /// Down (`d`).
    Down,
    /// An exit whose direction is not known (`-`).
    Unknown,
    /// Any other label, e.g. `enter` or `climb tree`.
    Custom(CustomExit),
}

/// A trimmed, non-empty exit label that is not one of the predefined ones.
///
/// Only [`Direction::parse`] creates these.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomExit(String);

impl CustomExit {
    /// Returns the label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Direction {
    /// The eight compass directions, clockwise from north.
    pub const COMPASS: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Parses a direction label.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the label is empty or only
    /// whitespace.
    pub fn parse(label: &str) -> Result<Self> {
        let label = label.trim();
        Ok(match label {
            "" => {
                return Err(Error::invalid_argument(
                    "direction label must not be empty",
                ));
            }
            "n" => Self::North,
            "ne" => Self::NorthEast,
            "e" => Self::East,
            "se" => Self::SouthEast,
            "s" => Self::South,
            "sw" => Self::SouthWest,
            "w" => Self::West,
            "nw" => Self::NorthWest,
            "u" => Self::Up,
            "d" => Self::Down,
            "-" => Self::Unknown,
            other => Self::Custom(CustomExit(other.to_string())),
        })
    }

    /// Creates a custom exit; predefined labels yield their own variant.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the label is empty.
    pub fn custom(label: impl AsRef<str>) -> Result<Self> {
        Self::parse(label.as_ref())
    }

    /// Returns the label of this direction.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::North => "n",
            Self::NorthEast => "ne",
            Self::East => "e",
            Self::SouthEast => "se",
            Self::South => "s",
            Self::SouthWest => "sw",
            Self::West => "w",
            Self::NorthWest => "nw",
            Self::Up => "u",
            Self::Down => "d",
            Self::Unknown => "-",
            Self::Custom(label) => label.as_str(),
        }
    }

    /// Returns true for the eight compass directions.
    #[must_use]
    pub fn is_compass(&self) -> bool {
        self.offset().is_some()
    }

    /// Returns the opposite direction, e.g. `n` for `s` or `d` for `u`.
    ///
    /// Unknown and custom directions have no opposite.
    #[must_use]
    pub fn opposite(&self) -> Option<Self> {
        Some(match self {
            Self::North => Self::South,
            Self::NorthEast => Self::SouthWest,
            Self::East => Self::West,
            Self::SouthEast => Self::NorthWest,
            Self::South => Self::North,
            Self::SouthWest => Self::NorthEast,
            Self::West => Self::East,
            Self::NorthWest => Self::SouthEast,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Unknown | Self::Custom(_) => return None,
        })
    }

    /// Returns the grid offset of a compass direction; north is `+y`.
    #[must_use]
    pub fn offset(&self) -> Option<(i32, i32)> {
        match self {
            Self::North => Some((0, 1)),
            Self::NorthEast => Some((1, 1)),
            Self::East => Some((1, 0)),
            Self::SouthEast => Some((1, -1)),
            Self::South => Some((0, -1)),
            Self::SouthWest => Some((-1, -1)),
            Self::West => Some((-1, 0)),
            Self::NorthWest => Some((-1, 1)),
            _ => None,
        }
    }

    /// Returns the compass direction pointing at a relative position.
    ///
    /// Only the signs of `dx` and `dy` matter. Returns `None` for `(0, 0)`.
    #[must_use]
    pub fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        let wanted = (dx.signum(), dy.signum());
        Self::COMPASS
            .into_iter()
            .find(|dir| dir.offset() == Some(wanted))
    }

    /// Returns the numeric keypad digit of a compass direction (8 is north).
    #[must_use]
    pub fn numpad(&self) -> Option<u8> {
        match self {
            Self::North => Some(8),
            Self::NorthEast => Some(9),
            Self::East => Some(6),
            Self::SouthEast => Some(3),
            Self::South => Some(2),
            Self::SouthWest => Some(1),
            Self::West => Some(4),
            Self::NorthWest => Some(7),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Direction {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Direction> for String {
    fn from(dir: Direction) -> Self {
        dir.as_str().to_string()
    }
}
