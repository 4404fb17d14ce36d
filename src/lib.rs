//! Mudgrid - world graph and spatial index for mapping text-based game worlds
//!
//! This crate re-exports all layers of the mudgrid system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: mudgrid_editor      - Clipboard, persistence records, save files
//! Layer 1: mudgrid_storage     - Layers, places, paths, world state, search
//! Layer 0: mudgrid_foundation  - Core types (ids, Direction, Color, Error)
//! ```

pub use mudgrid_editor as editor;
pub use mudgrid_foundation as foundation;
pub use mudgrid_storage as storage;
