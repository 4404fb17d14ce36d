//! Error types for mudgrid.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Expected conflicts such as an occupied exit are reported as values by the
//! operations that produce them; everything here is a failed operation.

use std::fmt;

use thiserror::Error;

use crate::ids::{AreaId, LayerId, PathId, PlaceId, RiskLevelId};

/// The main error type for mudgrid operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a place not found error.
    #[must_use]
    pub fn place_not_found(id: PlaceId) -> Self {
        Self::new(ErrorKind::PlaceNotFound(id))
    }

    /// Creates a layer not found error.
    #[must_use]
    pub fn layer_not_found(id: LayerId) -> Self {
        Self::new(ErrorKind::LayerNotFound(id))
    }

    /// Creates a path not found error.
    #[must_use]
    pub fn path_not_found(id: PathId) -> Self {
        Self::new(ErrorKind::PathNotFound(id))
    }

    /// Creates a risk level not found error.
    #[must_use]
    pub fn risk_level_not_found(id: RiskLevelId) -> Self {
        Self::new(ErrorKind::RiskLevelNotFound(id))
    }

    /// Creates an area not found error.
    #[must_use]
    pub fn area_not_found(id: AreaId) -> Self {
        Self::new(ErrorKind::AreaNotFound(id))
    }

    /// Creates an empty position error.
    #[must_use]
    pub fn position_not_found(layer: LayerId, x: i32, y: i32) -> Self {
        Self::new(ErrorKind::PositionNotFound { layer, x, y })
    }

    /// Creates an occupied position error.
    #[must_use]
    pub fn position_occupied(layer: LayerId, x: i32, y: i32, occupant: PlaceId) -> Self {
        Self::new(ErrorKind::PositionOccupied {
            layer,
            x,
            y,
            occupant,
        })
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Creates an error for an id kind with no free ids left.
    #[must_use]
    pub fn ids_exhausted(kind: &'static str) -> Self {
        Self::new(ErrorKind::IdsExhausted(kind))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true for errors caused by a missing id or cell.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::PlaceNotFound(_)
                | ErrorKind::LayerNotFound(_)
                | ErrorKind::PathNotFound(_)
                | ErrorKind::RiskLevelNotFound(_)
                | ErrorKind::AreaNotFound(_)
                | ErrorKind::PositionNotFound { .. }
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// No place with this id exists in the world.
    #[error("place not found: {0:?}")]
    PlaceNotFound(PlaceId),

    /// No layer with this id exists in the world.
    #[error("layer not found: {0:?}")]
    LayerNotFound(LayerId),

    /// No path with this id is connected.
    #[error("path not found: {0:?}")]
    PathNotFound(PathId),

    /// No risk level with this id exists in the world.
    #[error("risk level not found: {0:?}")]
    RiskLevelNotFound(RiskLevelId),

    /// No area with this id exists in the world.
    #[error("area not found: {0:?}")]
    AreaNotFound(AreaId),

    /// A layer cell that was expected to hold a place is empty.
    #[error("no place at position {x}, {y} on {layer}")]
    PositionNotFound {
        /// The layer that was queried.
        layer: LayerId,
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
    },

    /// A layer cell is already held by another place.
    #[error("position {x}, {y} on {layer} is already in use by {occupant:?}")]
    PositionOccupied {
        /// The layer of the cell.
        layer: LayerId,
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
        /// The place holding the cell.
        occupant: PlaceId,
    },

    /// A place's recorded layer disagrees with the layer asked to handle it.
    #[error("layer mismatch for {place:?}: expected {expected:?}, found {actual:?}")]
    LayerMismatch {
        /// The place involved.
        place: PlaceId,
        /// The layer the operation was performed on.
        expected: LayerId,
        /// The layer the place records, if any.
        actual: Option<LayerId>,
    },

    /// A layer cell does not hold the place whose position points at it.
    #[error("location mismatch for {place:?} at {x}, {y}: cell holds {found:?}")]
    PositionMismatch {
        /// The place involved.
        place: PlaceId,
        /// Recorded horizontal position of the place.
        x: i32,
        /// Recorded vertical position of the place.
        y: i32,
        /// What the cell actually holds.
        found: Option<PlaceId>,
    },

    /// A path was handed to a place that is not one of its endpoints.
    #[error("{place:?} is not an endpoint of the given path")]
    InvalidPath {
        /// The place the path was handed to.
        place: PlaceId,
    },

    /// A path connects a place to itself on the same exit.
    #[error("can not connect {place:?} to itself on the same exit {exit}")]
    SelfLoopConflict {
        /// The place involved.
        place: PlaceId,
        /// The exit used on both ends.
        exit: String,
    },

    /// A place id is already taken by a different place.
    #[error("place id already in use: {0:?}")]
    DuplicatePlaceId(PlaceId),

    /// Every id of a kind is taken.
    #[error("no free {0} id left")]
    IdsExhausted(&'static str),

    /// An argument was empty or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Encoding or decoding a saved world failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// What was being processed, e.g. a record kind.
    pub source: Option<String>,
    /// Index of the record being processed.
    pub index: Option<usize>,
    /// Outer operations, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source description.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the record index.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Adds an outer operation.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
            if let Some(index) = self.index {
                write!(f, " #{index}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
