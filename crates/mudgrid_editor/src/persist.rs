//! World save files in the `MessagePack` binary format.
//!
//! A save file holds one [`WorldRecord`]; loading goes through the record
//! loader, so a file that doesn't describe a consistent world is rejected.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use mudgrid_foundation::{Error, ErrorKind, Result};
use mudgrid_storage::World;

use crate::record::WorldRecord;

/// Serializes a world to bytes using `MessagePack` format.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(world: &World) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(&WorldRecord::capture(world))
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Deserializes a world from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if decoding fails or the records are inconsistent.
pub fn from_bytes(bytes: &[u8]) -> Result<World> {
    let record: WorldRecord = rmp_serde::from_slice(bytes)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))?;
    record.restore()
}

/// Saves a world to a file, replacing it if it exists.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn save_to_file<P: AsRef<Path>>(world: &World, path: P) -> Result<()> {
    let path = path.as_ref();
    let io_error = |action: &str, e: std::io::Error| {
        Error::new(ErrorKind::IoError(format!(
            "failed to {action} file '{}': {e}",
            path.display()
        )))
    };

    let bytes = to_bytes(world)?;
    let file = File::create(path).map_err(|e| io_error("create", e))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(|e| io_error("write to", e))?;
    writer.flush().map_err(|e| io_error("flush", e))?;
    Ok(())
}

/// Loads a world from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or doesn't hold a world.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<World> {
    let path = path.as_ref();
    let io_error = |action: &str, e: std::io::Error| {
        Error::new(ErrorKind::IoError(format!(
            "failed to {action} file '{}': {e}",
            path.display()
        )))
    };

    let file = File::open(path).map_err(|e| io_error("open", e))?;
    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| io_error("read", e))?;
    from_bytes(&bytes)
}
