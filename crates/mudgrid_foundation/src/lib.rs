//! Core identifiers, coordinates, directions, and errors for mudgrid.
//!
//! This crate provides:
//! - [`PlaceId`], [`LayerId`], [`PathId`], [`RiskLevelId`], [`AreaId`] - Typed identifiers
//! - [`IdAllocator`] - Per-world monotonic id assignment
//! - [`Coordinate`] - A position on a layer, used for views and the home position
//! - [`Direction`] - Exit direction labels
//! - [`Color`] - RGB colors for risk levels, areas, and path lines
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod color;
pub mod coordinate;
pub mod direction;
pub mod error;
pub mod ids;

pub use color::Color;
pub use coordinate::Coordinate;
pub use direction::{CustomExit, Direction};
pub use error::{Error, ErrorContext, ErrorKind};
pub use ids::{AreaId, IdAllocator, LayerId, PathId, PlaceId, RiskLevelId, SequentialId};

/// Result type alias using the mudgrid error type.
pub type Result<T> = std::result::Result<T, Error>;
