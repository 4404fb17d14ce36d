//! Layers, places, paths, and world state for mudgrid.
//!
//! This crate provides:
//! - [`Layer`] - Sparse cell index of one map layer
//! - [`Place`] - A mapped room with its attributes and links
//! - [`Path`] - An undirected connection between two place exits
//! - [`World`] - The aggregate owning all of the above, kept consistent
//! - [`SearchResult`] - Shortest routes found by [`World::breadth_search`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod layer;
pub mod listener;
pub mod path;
pub mod place;
pub mod search;
pub mod tag;
pub mod world;

pub use config::{ShowPlaceId, WorldConfig};
pub use layer::{BoundingBox, Layer, LayerElement, Placement};
pub use listener::{ChangeSource, ListenerId, WorldListener};
pub use path::{ConnectOutcome, Path};
pub use place::{Place, PlaceKind};
pub use search::SearchResult;
pub use tag::{Area, RiskLevel};
pub use world::World;
