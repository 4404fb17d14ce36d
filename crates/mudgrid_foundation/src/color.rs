//! RGB colors for risk levels, areas, and path lines.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An opaque RGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Color {
    /// Pure green, the default path line color.
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    /// Light gray.
    pub const GRAY: Color = Color::rgb(188, 188, 188);
    /// Yellow.
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    /// Orange.
    pub const ORANGE: Color = Color::rgb(255, 128, 0);
    /// Red.
    pub const RED: Color = Color::rgb(255, 0, 0);
    /// Sand, the default tile center color.
    pub const SAND: Color = Color::rgb(207, 190, 134);

    /// Creates a color from its components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
