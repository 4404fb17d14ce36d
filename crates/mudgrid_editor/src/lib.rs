//! Editing tools on top of mudgrid worlds.
//!
//! This crate provides:
//! - [`Clipboard`] - Copy, cut and paste of place selections
//! - [`WorldRecord`] - Plain-data records of a world for persistence
//! - [`WorldLoader`] - Builds a world from records, resolving forward references
//! - [`persist`] - `MessagePack` save files

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clipboard;
pub mod loader;
pub mod persist;
pub mod record;

pub use clipboard::{Clipboard, ClipboardMode, PasteOutcome};
pub use loader::WorldLoader;
pub use persist::{from_bytes, load_from_file, save_to_file, to_bytes};
pub use record::{ChildRecord, LayerRecord, PathRecord, PlaceRecord, WorldRecord};
