//! Display configuration stored with a world.

use std::collections::BTreeMap;

use mudgrid_foundation::{Color, Direction};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// When a place id is appended to its name on the map.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShowPlaceId {
    /// Never.
    None,
    /// Only if another place has the same name.
    #[default]
    Unique,
    /// Always.
    All,
}

/// Per-world display settings.
///
/// Controls path line colors and place labels.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldConfig {
    /// Color of paths on compass exits.
    pub path_color_cardinal: Color,

    /// Color of paths on any other exit.
    pub path_color_non_cardinal: Color,

    /// Colors overriding the defaults for specific exits.
    pub path_colors: BTreeMap<Direction, Color>,

    /// Color of the tile center marker.
    pub tile_center_color: Color,

    /// When place ids are shown next to names.
    pub show_place_id: ShowPlaceId,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            path_color_cardinal: Color::GREEN,
            path_color_non_cardinal: Color::GREEN,
            path_colors: BTreeMap::new(),
            tile_center_color: Color::SAND,
            show_place_id: ShowPlaceId::Unique,
        }
    }
}

impl WorldConfig {
    /// Returns the line color for paths on `exit`.
    #[must_use]
    pub fn path_color(&self, exit: &Direction) -> Color {
        if let Some(color) = self.path_colors.get(exit) {
            *color
        } else if exit.is_compass() {
            self.path_color_cardinal
        } else {
            self.path_color_non_cardinal
        }
    }

    /// Builder method to set the compass path color.
    #[must_use]
    pub fn with_path_color_cardinal(mut self, color: Color) -> Self {
        self.path_color_cardinal = color;
        self
    }

    /// Builder method to set the non-compass path color.
    #[must_use]
    pub fn with_path_color_non_cardinal(mut self, color: Color) -> Self {
        self.path_color_non_cardinal = color;
        self
    }

    /// Builder method to override the color of one exit.
    #[must_use]
    pub fn with_path_color(mut self, exit: Direction, color: Color) -> Self {
        self.path_colors.insert(exit, color);
        self
    }

    /// Builder method to set the tile center color.
    #[must_use]
    pub fn with_tile_center_color(mut self, color: Color) -> Self {
        self.tile_center_color = color;
        self
    }

    /// Builder method to set when place ids are shown.
    #[must_use]
    pub fn with_show_place_id(mut self, show: ShowPlaceId) -> Self {
        self.show_place_id = show;
        self
    }
}
