//! Risk levels and areas: tags shared by many places.

use std::fmt;

use mudgrid_foundation::{AreaId, Color, RiskLevelId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How dangerous a place is, with a display color.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RiskLevel {
    /// Id, unique within a world.
    pub id: RiskLevelId,
    /// Description, e.g. "mobs might attack".
    pub description: String,
    /// Display color.
    pub color: Color,
}

impl RiskLevel {
    /// Creates a risk level.
    #[must_use]
    pub fn new(id: RiskLevelId, description: impl Into<String>, color: Color) -> Self {
        Self {
            id,
            description: description.into(),
            color,
        }
    }

    /// The risk levels every new world starts with.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(RiskLevelId(0), "not evaluated", Color::GRAY),
            Self::new(RiskLevelId(1), "safe", Color::GREEN),
            Self::new(RiskLevelId(2), "mobs don't attack", Color::YELLOW),
            Self::new(RiskLevelId(3), "mobs might attack", Color::ORANGE),
            Self::new(RiskLevelId(4), "mobs will attack", Color::RED),
        ]
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// A named, colored group of places.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Area {
    /// Id, unique within a world.
    pub id: AreaId,
    /// Name, e.g. "Old Forest".
    pub name: String,
    /// Display color.
    pub color: Color,
}

impl Area {
    /// Name of the area placeholders are put in.
    pub const PLACEHOLDER: &'static str = "placeholder";

    /// Creates an area.
    #[must_use]
    pub fn new(id: AreaId, name: impl Into<String>, color: Color) -> Self {
        Self {
            id,
            name: name.into(),
            color,
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
