//! Copy, cut and paste of place selections.
//!
//! A selection is stored as place ids with offsets from an anchor cell, so
//! it can be pasted around any other anchor, on any layer.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use mudgrid_foundation::{Error, LayerId, PathId, PlaceId, Result};
use mudgrid_storage::{ConnectOutcome, LayerElement, Placement, World};
use tracing::debug;

/// Whether a paste duplicates the selection or moves it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipboardMode {
    /// Paste creates fresh copies; the clipboard can be pasted repeatedly.
    Copy,
    /// Paste moves the originals; the clipboard is emptied afterwards.
    Cut,
}

/// A selected place and its offset from the anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Entry {
    place: PlaceId,
    dx: i32,
    dy: i32,
}

impl Entry {
    fn target(&self, layer: LayerId, tx: i32, ty: i32) -> Option<Placement> {
        Placement::new(layer, tx, ty).offset(self.dx, self.dy)
    }
}

/// What [`Clipboard::paste`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum PasteOutcome {
    /// The selection was pasted; holds the pasted places in selection order.
    Pasted(Vec<PlaceId>),
    /// A target cell is held by a place outside the selection.
    Blocked {
        /// The blocked cell.
        at: Placement,
        /// The place holding it.
        occupant: PlaceId,
    },
    /// A target cell lies beyond the edge of the grid.
    OutOfBounds,
    /// The clipboard holds nothing.
    Empty,
}

impl PasteOutcome {
    /// Returns true if the selection was pasted.
    #[must_use]
    pub fn is_pasted(&self) -> bool {
        matches!(self, Self::Pasted(_))
    }

    /// The pasted places, if any.
    #[must_use]
    pub fn places(&self) -> &[PlaceId] {
        match self {
            Self::Pasted(places) => places,
            _ => &[],
        }
    }
}

/// Holds a copied or cut selection until it is pasted.
#[derive(Clone, Debug)]
pub struct Clipboard {
    mode: ClipboardMode,
    entries: Vec<Entry>,
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard {
    /// Creates an empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: ClipboardMode::Copy,
            entries: Vec::new(),
        }
    }

    /// The mode of the current selection.
    #[must_use]
    pub fn mode(&self) -> ClipboardMode {
        self.mode
    }

    /// Returns true if a selection is held.
    #[must_use]
    pub fn has_places(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of places held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the held places in selection order.
    pub fn places(&self) -> impl Iterator<Item = PlaceId> + '_ {
        self.entries.iter().map(|e| e.place)
    }

    /// Drops the held selection.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Copies `selection`, anchored at cell `(ax, ay)`.
    ///
    /// # Errors
    ///
    /// - `PlaceNotFound` if a selected place doesn't exist
    /// - `InvalidArgument` if the places stand on different layers, or a
    ///   place is too far from the anchor to store its offset
    ///
    /// The clipboard is unchanged on error.
    pub fn begin_copy(&mut self, world: &World, selection: &[PlaceId], ax: i32, ay: i32) -> Result<()> {
        self.begin(ClipboardMode::Copy, world, selection, ax, ay)
    }

    /// Cuts `selection`, anchored at cell `(ax, ay)`.
    ///
    /// The places stay where they are until the clipboard is pasted.
    ///
    /// # Errors
    ///
    /// Same as [`Clipboard::begin_copy`].
    pub fn begin_cut(&mut self, world: &World, selection: &[PlaceId], ax: i32, ay: i32) -> Result<()> {
        self.begin(ClipboardMode::Cut, world, selection, ax, ay)
    }

    fn begin(
        &mut self,
        mode: ClipboardMode,
        world: &World,
        selection: &[PlaceId],
        ax: i32,
        ay: i32,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        let mut layer = None;
        let mut entries = Vec::with_capacity(selection.len());
        for &id in selection {
            if !seen.insert(id) {
                continue;
            }
            let place = world.place(id).ok_or_else(|| Error::place_not_found(id))?;
            let Some(at) = place.placement() else {
                return Err(Error::internal(format!("{id:?} is registered but not placed")));
            };
            if *layer.get_or_insert(at.layer) != at.layer {
                return Err(Error::invalid_argument("a selection can not span several layers"));
            }
            let (Some(dx), Some(dy)) = (at.x.checked_sub(ax), at.y.checked_sub(ay)) else {
                return Err(Error::invalid_argument(format!(
                    "{id} is too far from the anchor {ax}, {ay}"
                )));
            };
            entries.push(Entry { place: id, dx, dy });
        }
        self.mode = mode;
        self.entries = entries;
        Ok(())
    }

    /// Returns true if the selection fits around `(tx, ty)` on `layer`.
    ///
    /// Without a layer, or with nothing held, there is nothing that could
    /// block a paste, so this is true. For a cut, cells held by the
    /// selection itself count as free. A target beyond the edge of the
    /// grid never fits.
    #[must_use]
    pub fn can_paste(&self, world: &World, tx: i32, ty: i32, layer: Option<LayerId>) -> bool {
        let Some(layer) = layer else {
            return true;
        };
        self.targets(tx, ty, layer)
            .is_some_and(|targets| self.blocker(world, &targets).is_none())
    }

    /// Target cells in selection order, or `None` if one is off the grid.
    fn targets(&self, tx: i32, ty: i32, layer: LayerId) -> Option<Vec<(PlaceId, Placement)>> {
        self.entries
            .iter()
            .map(|e| Some((e.place, e.target(layer, tx, ty)?)))
            .collect()
    }

    fn blocker(&self, world: &World, targets: &[(PlaceId, Placement)]) -> Option<(Placement, PlaceId)> {
        let moving: HashSet<PlaceId> = match self.mode {
            ClipboardMode::Copy => HashSet::new(),
            ClipboardMode::Cut => self.places().collect(),
        };
        targets.iter().find_map(|&(_, at)| {
            world
                .place_at(at.layer, at.x, at.y)
                .map(LayerElement::element_id)
                .filter(|occupant| !moving.contains(occupant))
                .map(|occupant| (at, occupant))
        })
    }

    /// Pastes the selection with its anchor at `(tx, ty)` on `layer`.
    ///
    /// A copy inserts fresh duplicates and reconnects the paths and
    /// sub-area links whose both ends were selected; links leaving the
    /// selection are not copied. A cut moves the originals with all their
    /// links and empties the clipboard.
    ///
    /// # Errors
    ///
    /// Returns `PlaceNotFound` if a held place was removed since the
    /// selection was taken. Nothing is pasted in that case.
    pub fn paste(&mut self, world: &mut World, tx: i32, ty: i32, layer: LayerId) -> Result<PasteOutcome> {
        if self.entries.is_empty() {
            return Ok(PasteOutcome::Empty);
        }
        for entry in &self.entries {
            if world.place(entry.place).is_none() {
                return Err(Error::place_not_found(entry.place));
            }
        }
        let Some(targets) = self.targets(tx, ty, layer) else {
            return Ok(PasteOutcome::OutOfBounds);
        };
        if let Some((at, occupant)) = self.blocker(world, &targets) {
            return Ok(PasteOutcome::Blocked { at, occupant });
        }

        let pasted = match self.mode {
            ClipboardMode::Copy => Self::paste_copy(world, &targets)?,
            ClipboardMode::Cut => {
                world.move_places(&targets)?;
                self.clear();
                targets.into_iter().map(|(id, _)| id).collect()
            }
        };

        debug!(count = pasted.len(), mode = ?self.mode, layer = layer.get(), tx, ty, "pasted selection");
        Ok(PasteOutcome::Pasted(pasted))
    }

    fn paste_copy(world: &mut World, targets: &[(PlaceId, Placement)]) -> Result<Vec<PlaceId>> {
        let mut copies = BTreeMap::new();
        let mut pasted = Vec::with_capacity(targets.len());
        for &(original, at) in targets {
            let copy = world.duplicate_place(original)?;
            let id = world.put_place(copy, at.layer, at.x, at.y)?;
            copies.insert(original, id);
            pasted.push(id);
        }

        let internal: BTreeSet<PathId> = targets
            .iter()
            .flat_map(|&(original, _)| world.paths_of(original))
            .filter(|(_, path)| path.places().iter().all(|p| copies.contains_key(p)))
            .map(|(id, _)| id)
            .collect();
        for path_id in internal {
            let Some(path) = world.path(path_id) else {
                continue;
            };
            let copy = path.remap(|p| copies.get(&p).copied().unwrap_or(p));
            let from = copy.places()[0];
            if let ConnectOutcome::ExitOccupied { place, exit, .. } = world.connect_path(from, copy)? {
                return Err(Error::internal(format!(
                    "exit {exit} of fresh copy {place} is already taken"
                )));
            }
        }

        let links: Vec<(PlaceId, PlaceId)> = targets
            .iter()
            .filter_map(|&(original, _)| world.place(original))
            .flat_map(|p| p.children().map(move |child| (p.id(), child)))
            .filter_map(|(parent, child)| Some((*copies.get(&parent)?, *copies.get(&child)?)))
            .collect();
        for (parent, child) in links {
            world.connect_child(parent, child)?;
        }

        Ok(pasted)
    }
}
