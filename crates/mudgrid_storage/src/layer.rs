//! Sparse per-layer spatial index.
//!
//! A layer maps `(x, y)` cells to the place standing there. Columns are
//! created lazily and dropped again when their last cell is vacated, so an
//! empty region costs nothing.

use im::OrdMap;
use mudgrid_foundation::{Coordinate, Error, ErrorKind, LayerId, PlaceId, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a place stands: a layer and a cell on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// The layer.
    pub layer: LayerId,
    /// Horizontal cell position.
    pub x: i32,
    /// Vertical cell position; north is `+y`.
    pub y: i32,
}

impl Placement {
    /// Creates a placement.
    #[must_use]
    pub const fn new(layer: LayerId, x: i32, y: i32) -> Self {
        Self { layer, x, y }
    }

    /// Returns this placement shifted by `(dx, dy)` on the same layer, or
    /// `None` if that leaves the grid.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            ..self
        })
    }

    /// Returns the tile-center coordinate of this placement.
    #[must_use]
    pub fn coordinate(self) -> Coordinate {
        Coordinate::at_tile(self.layer, self.x, self.y)
    }
}

/// Something that can stand on a layer cell.
pub trait LayerElement {
    /// The id the layer indexes this element under.
    fn element_id(&self) -> PlaceId;

    /// Where the element believes it stands, if anywhere.
    fn placement(&self) -> Option<Placement>;

    /// Records a new position for the element.
    fn set_placement(&mut self, placement: Option<Placement>);
}

/// Extent of the occupied cells of a layer.
///
/// An empty layer reports the degenerate box with every bound at zero.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundingBox {
    /// Smallest occupied x.
    pub x_min: i32,
    /// Largest occupied x.
    pub x_max: i32,
    /// Smallest occupied y.
    pub y_min: i32,
    /// Largest occupied y.
    pub y_max: i32,
}

impl BoundingBox {
    /// Number of columns spanned.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.x_max - self.x_min + 1
    }

    /// Number of rows spanned.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.y_max - self.y_min + 1
    }

    /// Returns true if `(x, y)` lies inside the box.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }
}

/// One map level: a sparse grid of places.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layer {
    id: LayerId,
    name: Option<String>,
    /// Column index: x -> y -> place.
    cells: OrdMap<i32, OrdMap<i32, PlaceId>>,
    len: usize,
}

impl Layer {
    /// Creates an empty layer.
    #[must_use]
    pub fn new(id: LayerId) -> Self {
        Self {
            id,
            name: None,
            cells: OrdMap::new(),
            len: 0,
        }
    }

    /// Creates an empty named layer.
    #[must_use]
    pub fn with_name(id: LayerId, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(id)
        }
    }

    /// Returns the layer id.
    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Returns the layer name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets or clears the layer name.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name.filter(|n| !n.is_empty());
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Puts a place on a cell.
    ///
    /// Putting a place on the cell it already holds is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `PositionOccupied` if a different place holds the cell; the
    /// layer is left unchanged.
    pub fn put(&mut self, place: PlaceId, x: i32, y: i32) -> Result<()> {
        match self.get(x, y) {
            Some(occupant) if occupant == place => return Ok(()),
            Some(occupant) => return Err(Error::position_occupied(self.id, x, y, occupant)),
            None => {}
        }

        let mut column = self.cells.get(&x).cloned().unwrap_or_default();
        column.insert(y, place);
        self.cells.insert(x, column);
        self.len += 1;
        Ok(())
    }

    /// Gets the place on a cell.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<PlaceId> {
        self.cells.get(&x).and_then(|column| column.get(&y)).copied()
    }

    /// Gets the place on a cell.
    ///
    /// # Errors
    ///
    /// Returns `PositionNotFound` if the cell is empty.
    pub fn try_get(&self, x: i32, y: i32) -> Result<PlaceId> {
        self.get(x, y)
            .ok_or_else(|| Error::position_not_found(self.id, x, y))
    }

    /// Returns true if a place holds the cell.
    #[must_use]
    pub fn exists(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some()
    }

    /// Removes an element from the cell it records as its own.
    ///
    /// # Errors
    ///
    /// - `LayerMismatch` if the element doesn't record this layer
    /// - `PositionMismatch` if the recorded cell holds something else
    pub fn remove(&mut self, element: &impl LayerElement) -> Result<()> {
        let id = element.element_id();
        let placement = element.placement();
        let Some(placement) = placement.filter(|p| p.layer == self.id) else {
            return Err(Error::new(ErrorKind::LayerMismatch {
                place: id,
                expected: self.id,
                actual: placement.map(|p| p.layer),
            }));
        };

        let (x, y) = (placement.x, placement.y);
        let found = self.get(x, y);
        if found != Some(id) {
            return Err(Error::new(ErrorKind::PositionMismatch {
                place: id,
                x,
                y,
                found,
            }));
        }

        self.vacate(x, y);
        Ok(())
    }

    fn vacate(&mut self, x: i32, y: i32) {
        if let Some(mut column) = self.cells.get(&x).cloned() {
            if column.remove(&y).is_some() {
                self.len -= 1;
            }
            if column.is_empty() {
                self.cells.remove(&x);
            } else {
                self.cells.insert(x, column);
            }
        }
    }

    /// Returns every place within Chebyshev distance `radius` of `(x, y)`,
    /// excluding the cell itself, ordered by x then y.
    #[must_use]
    pub fn neighbors(&self, x: i32, y: i32, radius: u32) -> Vec<(i32, i32, PlaceId)> {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        let (x_lo, x_hi) = (x.saturating_sub(r), x.saturating_add(r));
        let (y_lo, y_hi) = (y.saturating_sub(r), y.saturating_add(r));

        self.cells
            .range(x_lo..=x_hi)
            .flat_map(|(cx, column)| {
                column
                    .range(y_lo..=y_hi)
                    .map(move |(cy, place)| (*cx, *cy, *place))
            })
            .filter(|(cx, cy, _)| (*cx, *cy) != (x, y))
            .collect()
    }

    /// Returns the extent of all occupied cells.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let mut cells = self.iter();
        let Some((x, y, _)) = cells.next() else {
            return BoundingBox::default();
        };
        cells.fold(
            BoundingBox {
                x_min: x,
                x_max: x,
                y_min: y,
                y_max: y,
            },
            |bb, (x, y, _)| BoundingBox {
                x_min: bb.x_min.min(x),
                x_max: bb.x_max.max(x),
                y_min: bb.y_min.min(y),
                y_max: bb.y_max.max(y),
            },
        )
    }

    /// Returns the point a preview of this layer should be centered on.
    #[must_use]
    pub fn center(&self) -> Coordinate {
        let bb = self.bounding_box();
        Coordinate::new(
            self.id,
            f64::from(bb.x_min) + f64::from(bb.width()) / 2.0,
            f64::from(bb.y_min) + f64::from(bb.height()) / 2.0 - 1.0,
        )
    }

    /// Iterates over occupied cells ordered by x then y.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, PlaceId)> + '_ {
        self.cells.iter().flat_map(|(x, column)| {
            column.iter().map(move |(y, place)| (*x, *y, *place))
        })
    }
}
