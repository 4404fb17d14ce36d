//! World state: the aggregate root of the map.
//!
//! The `World` owns every layer, place, path, risk level and area, keyed by
//! id. Places refer to each other and to their layer by id only; the world
//! keeps both sides of every link consistent. Collections are persistent
//! (`im`), so [`World::snapshot`] is cheap enough to take before every edit.

use std::collections::HashSet;
use std::sync::Arc;

use im::OrdMap;
use mudgrid_foundation::{
    AreaId, Color, Coordinate, Direction, Error, ErrorKind, IdAllocator, LayerId, PathId,
    PlaceId, Result, RiskLevelId, SequentialId,
};
use tracing::{trace, warn};

use crate::config::{ShowPlaceId, WorldConfig};
use crate::layer::{Layer, LayerElement, Placement};
use crate::listener::{ChangeSource, ListenerId, Listeners, WorldListener};
use crate::path::{ConnectOutcome, Path};
use crate::place::Place;
use crate::tag::{Area, RiskLevel};

/// A mapped world.
///
/// Single-owner and single-threaded: every mutation runs to completion
/// before the next one starts, and listeners are called synchronously.
#[derive(Clone, Debug)]
pub struct World {
    name: String,
    home: Coordinate,
    config: WorldConfig,
    places: OrdMap<PlaceId, Place>,
    /// How many places carry each name.
    place_names: OrdMap<String, usize>,
    layers: OrdMap<LayerId, Layer>,
    paths: OrdMap<PathId, Path>,
    risk_levels: OrdMap<RiskLevelId, RiskLevel>,
    areas: OrdMap<AreaId, Area>,
    place_ids: IdAllocator<PlaceId>,
    path_ids: IdAllocator<PathId>,
    listeners: Listeners,
}

impl Default for World {
    fn default() -> Self {
        Self::new("")
    }
}

impl World {
    /// Creates an empty world with the default risk levels.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut world = Self::empty(name);
        for level in RiskLevel::defaults() {
            world.risk_levels.insert(level.id, level);
        }
        world
    }

    /// Creates a world without any risk levels.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            home: Coordinate::default(),
            config: WorldConfig::default(),
            places: OrdMap::new(),
            place_names: OrdMap::new(),
            layers: OrdMap::new(),
            paths: OrdMap::new(),
            risk_levels: OrdMap::new(),
            areas: OrdMap::new(),
            place_ids: IdAllocator::new(),
            path_ids: IdAllocator::new(),
            listeners: Listeners::default(),
        }
    }

    /// Returns a copy of the world without listeners.
    ///
    /// Collections share structure with the original, so this is cheap.
    #[must_use]
    pub fn snapshot(&self) -> World {
        World {
            listeners: Listeners::default(),
            ..self.clone()
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Returns the world name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the world name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.notify(ChangeSource::World);
    }

    /// Returns the home position.
    #[must_use]
    pub fn home(&self) -> Coordinate {
        self.home
    }

    /// Sets the home position.
    pub fn set_home(&mut self, home: Coordinate) {
        self.home = home;
        self.notify(ChangeSource::World);
    }

    /// Returns the display configuration.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Replaces the display configuration.
    pub fn set_config(&mut self, config: WorldConfig) {
        self.config = config;
        self.notify(ChangeSource::World);
    }

    /// Returns the line color for paths on `exit`.
    #[must_use]
    pub fn path_color(&self, exit: &Direction) -> Color {
        self.config.path_color(exit)
    }

    /// Overrides the line color for paths on `exit`.
    pub fn set_path_color(&mut self, exit: Direction, color: Color) {
        self.config.path_colors.insert(exit, color);
        self.notify(ChangeSource::World);
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Registers a change listener; registering the same listener twice
    /// returns the existing handle.
    pub fn add_listener(&mut self, listener: Arc<dyn WorldListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Removes a change listener. Returns false if it wasn't registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn notify(&self, source: ChangeSource) {
        self.listeners.notify(source);
    }

    // =========================================================================
    // Places
    // =========================================================================

    /// Gets a place.
    #[must_use]
    pub fn place(&self, id: PlaceId) -> Option<&Place> {
        self.places.get(&id)
    }

    /// Gets the place standing on a cell.
    #[must_use]
    pub fn place_at(&self, layer: LayerId, x: i32, y: i32) -> Option<&Place> {
        self.layers
            .get(&layer)
            .and_then(|l| l.get(x, y))
            .and_then(|id| self.places.get(&id))
    }

    /// Iterates over all places ordered by id.
    pub fn places(&self) -> impl Iterator<Item = &Place> + '_ {
        self.places.values()
    }

    /// Number of places.
    #[must_use]
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// Creates an unplaced place with a fresh id.
    ///
    /// Once every place id has been handed out this repeats the largest
    /// id, which [`World::put_place`] rejects as `DuplicatePlaceId`.
    pub fn new_place(&mut self, name: impl Into<String>) -> Place {
        Place::new(self.place_ids.allocate(), name)
    }

    /// Creates an unplaced, unconnected copy of a place with a fresh id.
    ///
    /// # Errors
    ///
    /// - `PlaceNotFound` if the place doesn't exist
    /// - `IdsExhausted` if every place id has been handed out
    pub fn duplicate_place(&mut self, id: PlaceId) -> Result<Place> {
        let original = self.places.get(&id).ok_or_else(|| Error::place_not_found(id))?;
        let copy_id = self
            .place_ids
            .try_allocate()
            .ok_or_else(|| Error::ids_exhausted("place"))?;
        Ok(original.duplicate(copy_id))
    }

    /// Puts a new place on a cell, creating the layer if necessary.
    ///
    /// The place enters the world unconnected; connections a cloned place
    /// still lists are dropped.
    ///
    /// # Errors
    ///
    /// - `DuplicatePlaceId` if the id is taken
    /// - `AreaNotFound` / `RiskLevelNotFound` for unknown tags
    /// - `PositionOccupied` if the cell is held by another place
    pub fn put_place(&mut self, mut place: Place, layer: LayerId, x: i32, y: i32) -> Result<PlaceId> {
        let id = place.id();
        if self.places.contains_key(&id) {
            return Err(Error::new(ErrorKind::DuplicatePlaceId(id)));
        }
        self.check_tags(&place)?;
        if let Some(occupant) = self.layers.get(&layer).and_then(|l| l.get(x, y)) {
            return Err(Error::position_occupied(layer, x, y, occupant));
        }

        if !self.layers.contains_key(&layer) {
            self.layers.insert(layer, Layer::new(layer));
        }
        self.layer_mut(layer)?.put(id, x, y)?;

        place.clear_connections();
        place.set_placement(Some(Placement::new(layer, x, y)));
        self.place_ids.observe(id);
        self.count_name(place.name(), true);
        self.places.insert(id, place);

        trace!(place = id.get(), layer = layer.get(), x, y, "place put");
        self.notify(ChangeSource::Place(id));
        Ok(id)
    }

    /// Moves a place to another cell, keeping all its connections.
    ///
    /// # Errors
    ///
    /// - `PlaceNotFound` if the place doesn't exist
    /// - `PositionOccupied` if the target cell is held by another place
    pub fn move_place(&mut self, id: PlaceId, layer: LayerId, x: i32, y: i32) -> Result<()> {
        self.move_places(&[(id, Placement::new(layer, x, y))])
    }

    /// Moves several places at once.
    ///
    /// Targets may be cells currently held by other places of the same
    /// batch. Either every place moves or none does.
    ///
    /// # Errors
    ///
    /// - `PlaceNotFound` if a place doesn't exist
    /// - `InvalidArgument` if a place is listed twice or two places target the same cell
    /// - `PositionOccupied` if a target is held by a place outside the batch
    /// - `PositionMismatch` / `LayerMismatch` if a place is out of sync with its layer
    pub fn move_places(&mut self, moves: &[(PlaceId, Placement)]) -> Result<()> {
        let moving: HashSet<PlaceId> = moves.iter().map(|(id, _)| *id).collect();
        if moving.len() != moves.len() {
            return Err(Error::invalid_argument("a place is moved twice in one batch"));
        }

        let mut targets = HashSet::new();
        for (id, to) in moves {
            let place = self.places.get(id).ok_or_else(|| Error::place_not_found(*id))?;
            self.check_indexed(place)?;
            if !targets.insert(*to) {
                return Err(Error::invalid_argument(format!(
                    "two places moved to {}, {} on {}",
                    to.x, to.y, to.layer
                )));
            }
            if let Some(occupant) = self.layers.get(&to.layer).and_then(|l| l.get(to.x, to.y)) {
                if !moving.contains(&occupant) {
                    return Err(Error::position_occupied(to.layer, to.x, to.y, occupant));
                }
            }
        }

        for (id, _) in moves {
            let place = self.places.get(id).ok_or_else(|| Error::place_not_found(*id))?;
            let from = place
                .placement()
                .ok_or_else(|| Error::internal(format!("{id:?} is not placed")))?;
            self.layers
                .get_mut(&from.layer)
                .ok_or_else(|| Error::layer_not_found(from.layer))?
                .remove(place)?;
        }
        for (id, to) in moves {
            if !self.layers.contains_key(&to.layer) {
                self.layers.insert(to.layer, Layer::new(to.layer));
            }
            self.layer_mut(to.layer)?.put(*id, to.x, to.y)?;
            if let Some(place) = self.places.get_mut(id) {
                place.set_placement(Some(*to));
            }
        }

        for (id, to) in moves {
            trace!(place = id.get(), layer = to.layer.get(), x = to.x, y = to.y, "place moved");
            self.notify(ChangeSource::Place(*id));
        }
        Ok(())
    }

    /// Moves a place out of `source` and onto a cell of this world.
    ///
    /// The place keeps its id. Its connections are severed, since they
    /// point into the other world. Its area and risk level are carried over,
    /// reusing an existing area of the same name or a risk level with the
    /// same description.
    ///
    /// # Errors
    ///
    /// - `PlaceNotFound` if `source` has no such place
    /// - `DuplicatePlaceId` if the id is taken here
    /// - `PositionOccupied` if the target cell is held
    pub fn transfer_place(
        &mut self,
        source: &mut World,
        id: PlaceId,
        layer: LayerId,
        x: i32,
        y: i32,
    ) -> Result<PlaceId> {
        let original = source.place(id).ok_or_else(|| Error::place_not_found(id))?;
        if self.places.contains_key(&id) {
            return Err(Error::new(ErrorKind::DuplicatePlaceId(id)));
        }
        if let Some(occupant) = self.layers.get(&layer).and_then(|l| l.get(x, y)) {
            return Err(Error::position_occupied(layer, x, y, occupant));
        }
        let area = original.area().and_then(|a| source.area(a)).cloned();
        let risk_level = original.risk_level().and_then(|r| source.risk_level(r)).cloned();

        let area = area.map(|a| self.adopt_area(a)).transpose()?;
        let risk_level = risk_level.map(|r| self.adopt_risk_level(r)).transpose()?;

        let mut place = source.remove_place(id)?;
        place.set_area(area);
        place.set_risk_level(risk_level);
        self.put_place(place, layer, x, y)
    }

    /// Removes a place after severing all its paths and sub-area links.
    ///
    /// Returns the removed place, unplaced and unconnected.
    ///
    /// # Errors
    ///
    /// - `PlaceNotFound` if the place doesn't exist
    /// - `LayerMismatch` / `PositionMismatch` if the place is out of sync
    ///   with the layer it records; nothing is changed in that case
    pub fn remove_place(&mut self, id: PlaceId) -> Result<Place> {
        let place = self.places.get(&id).ok_or_else(|| Error::place_not_found(id))?;
        let layer_id = place
            .layer()
            .ok_or_else(|| Error::internal(format!("{id:?} is registered but not placed")))?;
        let layer = self.layers.get_mut(&layer_id).ok_or_else(|| {
            Error::new(ErrorKind::LayerMismatch {
                place: id,
                expected: layer_id,
                actual: Some(layer_id),
            })
        })?;
        layer.remove(place)?;

        self.sever(id);
        let mut place = self
            .places
            .remove(&id)
            .ok_or_else(|| Error::place_not_found(id))?;
        place.set_placement(None);
        self.count_name(place.name(), false);

        trace!(place = id.get(), "place removed");
        self.notify(ChangeSource::Place(id));
        Ok(place)
    }

    /// Reserves a cell with a nameless placeholder.
    ///
    /// The placeholder joins the "placeholder" area (created on first use)
    /// and risk level 0, if the world has one. An occupied cell is silently
    /// left alone; other failures are logged. Returns the new place's id.
    pub fn put_placeholder(&mut self, layer: LayerId, x: i32, y: i32) -> Option<PlaceId> {
        if self.place_at(layer, x, y).is_some() {
            return None;
        }

        let Some(id) = self.place_ids.try_allocate() else {
            warn!(layer = layer.get(), x, y, "no place id left for a placeholder");
            return None;
        };
        let mut place = Place::placeholder(id);
        let area = match self.area_by_name(Area::PLACEHOLDER) {
            Some(area) => area.id,
            None => match self.add_area(Area::new(AreaId(0), Area::PLACEHOLDER, Color::GREEN)) {
                Ok(area) => area,
                Err(err) => {
                    warn!(error = %err, "couldn't create the placeholder area");
                    return None;
                }
            },
        };
        place.set_area(Some(area));
        if self.risk_levels.contains_key(&RiskLevelId(0)) {
            place.set_risk_level(Some(RiskLevelId(0)));
        }

        match self.put_place(place, layer, x, y) {
            Ok(id) => Some(id),
            Err(err) if matches!(err.kind, ErrorKind::PositionOccupied { .. }) => None,
            Err(err) => {
                warn!(error = %err, layer = layer.get(), x, y, "couldn't put placeholder on the map");
                None
            }
        }
    }

    /// Edits a place's attributes.
    ///
    /// The edit runs on a copy which replaces the place only if its area
    /// and risk level exist and its position is untouched.
    ///
    /// # Errors
    ///
    /// - `PlaceNotFound` if the place doesn't exist
    /// - `AreaNotFound` / `RiskLevelNotFound` for unknown tags
    /// - `InvalidArgument` if the edit changed the position
    pub fn modify_place<R>(&mut self, id: PlaceId, edit: impl FnOnce(&mut Place) -> R) -> Result<R> {
        let current = self.places.get(&id).ok_or_else(|| Error::place_not_found(id))?;
        let old_name = current.name().to_string();
        let mut edited = current.clone();

        let result = edit(&mut edited);

        if edited.placement() != current.placement() {
            return Err(Error::invalid_argument(
                "a place's position can only be changed by moving it",
            ));
        }
        self.check_tags(&edited)?;

        if edited.name() != old_name {
            self.count_name(&old_name, false);
            self.count_name(edited.name(), true);
        }
        self.places.insert(id, edited);
        self.notify(ChangeSource::Place(id));
        Ok(result)
    }

    /// Number of places carrying `name`.
    #[must_use]
    pub fn place_name_count(&self, name: &str) -> usize {
        self.place_names.get(name).copied().unwrap_or(0)
    }

    /// Returns true if at most one place carries `name`.
    #[must_use]
    pub fn is_place_name_unique(&self, name: &str) -> bool {
        self.place_name_count(name) <= 1
    }

    /// Returns the label a place is shown with, following
    /// [`WorldConfig::show_place_id`].
    #[must_use]
    pub fn place_label(&self, id: PlaceId) -> Option<String> {
        let place = self.places.get(&id)?;
        let show_id = match self.config.show_place_id {
            ShowPlaceId::None => false,
            ShowPlaceId::Unique => !self.is_place_name_unique(place.name()),
            ShowPlaceId::All => true,
        };
        Some(if show_id {
            place.to_string()
        } else {
            place.name().to_string()
        })
    }

    /// Returns the places matching every keyword, ordered by id.
    #[must_use]
    pub fn search_places<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<PlaceId> {
        self.places
            .values()
            .filter(|p| p.matches_keywords(keywords))
            .map(Place::id)
            .collect()
    }

    fn count_name(&mut self, name: &str, added: bool) {
        let count = self.place_name_count(name);
        let count = if added { count + 1 } else { count.saturating_sub(1) };
        if count == 0 {
            self.place_names.remove(name);
        } else {
            self.place_names.insert(name.to_string(), count);
        }
    }

    fn check_tags(&self, place: &Place) -> Result<()> {
        if let Some(area) = place.area() {
            if !self.areas.contains_key(&area) {
                return Err(Error::area_not_found(area));
            }
        }
        if let Some(level) = place.risk_level() {
            if !self.risk_levels.contains_key(&level) {
                return Err(Error::risk_level_not_found(level));
            }
        }
        Ok(())
    }

    /// Checks that a place's layer cell holds the place.
    fn check_indexed(&self, place: &Place) -> Result<()> {
        let id = place.id();
        let Some(at) = place.placement() else {
            return Err(Error::internal(format!("{id:?} is registered but not placed")));
        };
        let Some(layer) = self.layers.get(&at.layer) else {
            return Err(Error::new(ErrorKind::LayerMismatch {
                place: id,
                expected: at.layer,
                actual: Some(at.layer),
            }));
        };
        let found = layer.get(at.x, at.y);
        if found == Some(id) {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::PositionMismatch {
                place: id,
                x: at.x,
                y: at.y,
                found,
            }))
        }
    }

    // =========================================================================
    // Paths
    // =========================================================================

    /// Gets a connected path.
    #[must_use]
    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.get(&id)
    }

    /// Iterates over all connected paths ordered by id.
    pub fn paths(&self) -> impl Iterator<Item = (PathId, &Path)> + '_ {
        self.paths.iter().map(|(id, path)| (*id, path))
    }

    /// Iterates over the paths of a place in connection order.
    pub fn paths_of(&self, place: PlaceId) -> impl Iterator<Item = (PathId, &Path)> + '_ {
        self.places
            .get(&place)
            .map(Place::paths)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.paths.get(id).map(|path| (*id, path)))
    }

    /// Returns the path attached to exit `dir` of `place`.
    #[must_use]
    pub fn path_at_exit(&self, place: PlaceId, dir: &Direction) -> Option<PathId> {
        self.paths_of(place)
            .find(|(_, path)| path.exits_of(place).any(|exit| exit == dir))
            .map(|(id, _)| id)
    }

    /// Returns the paths connecting `a` and `b`.
    #[must_use]
    pub fn paths_between(&self, a: PlaceId, b: PlaceId) -> Vec<PathId> {
        self.paths_of(a)
            .filter(|(_, path)| path.has_place(b))
            .map(|(id, _)| id)
            .collect()
    }

    /// Connects a path on behalf of `place`, one of its endpoints.
    ///
    /// The exits are checked on `place` first, then on the other endpoint.
    /// The path is registered on both endpoints only if every exit it uses
    /// is free; otherwise nothing changes and the taken exit is reported.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` if `place` is not an endpoint
    /// - `PlaceNotFound` if an endpoint doesn't exist
    /// - `SelfLoopConflict` if both ends are the same exit of the same place
    /// - `IdsExhausted` if every path id has been handed out
    pub fn connect_path(&mut self, place: PlaceId, path: Path) -> Result<ConnectOutcome> {
        let Some(other) = path.other_place(place) else {
            return Err(Error::new(ErrorKind::InvalidPath { place }));
        };
        for endpoint in [place, other] {
            if !self.places.contains_key(&endpoint) {
                return Err(Error::place_not_found(endpoint));
            }
        }
        if path.is_self_loop() && path.exits()[0] == path.exits()[1] {
            return Err(Error::new(ErrorKind::SelfLoopConflict {
                place,
                exit: path.exits()[0].to_string(),
            }));
        }

        let endpoints = if path.is_self_loop() {
            vec![place]
        } else {
            vec![place, other]
        };
        for endpoint in &endpoints {
            for exit in path.exits_of(*endpoint) {
                if let Some(by) = self.path_at_exit(*endpoint, exit) {
                    return Ok(ConnectOutcome::ExitOccupied {
                        place: *endpoint,
                        exit: exit.clone(),
                        by,
                    });
                }
            }
        }

        let id = self
            .path_ids
            .try_allocate()
            .ok_or_else(|| Error::ids_exhausted("path"))?;
        for endpoint in &endpoints {
            if let Some(p) = self.places.get_mut(endpoint) {
                p.paths.push(id);
            }
        }
        trace!(path_id = id.get(), %path, "path connected");
        self.paths.insert(id, path);

        self.notify(ChangeSource::Place(place));
        Ok(ConnectOutcome::Connected(id))
    }

    /// Removes a path from both endpoints.
    ///
    /// Removing an unknown path does nothing. Returns the removed path.
    pub fn remove_path(&mut self, id: PathId) -> Option<Path> {
        let path = self.detach_path(id)?;
        self.notify(ChangeSource::Place(path.places()[0]));
        Some(path)
    }

    fn detach_path(&mut self, id: PathId) -> Option<Path> {
        let path = self.paths.remove(&id)?;
        for endpoint in path.places() {
            if let Some(place) = self.places.get_mut(&endpoint) {
                place.paths.retain(|p| *p != id);
            }
        }
        Some(path)
    }

    // =========================================================================
    // Sub-areas
    // =========================================================================

    /// Makes `child` a sub-area of `parent`.
    ///
    /// # Errors
    ///
    /// Returns `PlaceNotFound` if either place doesn't exist.
    pub fn connect_child(&mut self, parent: PlaceId, child: PlaceId) -> Result<()> {
        for id in [parent, child] {
            if !self.places.contains_key(&id) {
                return Err(Error::place_not_found(id));
            }
        }
        if let Some(p) = self.places.get_mut(&parent) {
            p.children.insert(child);
        }
        if let Some(c) = self.places.get_mut(&child) {
            c.parents.insert(parent);
        }
        self.notify(ChangeSource::Place(parent));
        Ok(())
    }

    /// Removes a parent/child link. Returns false if there was none.
    pub fn remove_child(&mut self, parent: PlaceId, child: PlaceId) -> bool {
        let removed = self
            .places
            .get_mut(&parent)
            .and_then(|p| p.children.remove(&child))
            .is_some();
        if let Some(c) = self.places.get_mut(&child) {
            c.parents.remove(&parent);
        }
        if removed {
            self.notify(ChangeSource::Place(parent));
        }
        removed
    }

    /// Severs every path and sub-area link of a place.
    ///
    /// # Errors
    ///
    /// Returns `PlaceNotFound` if the place doesn't exist.
    pub fn remove_connections(&mut self, id: PlaceId) -> Result<()> {
        if !self.places.contains_key(&id) {
            return Err(Error::place_not_found(id));
        }
        self.sever(id);
        self.notify(ChangeSource::Place(id));
        Ok(())
    }

    fn sever(&mut self, id: PlaceId) {
        let Some(place) = self.places.get(&id) else {
            return;
        };
        let paths = place.paths().to_vec();
        let children: Vec<_> = place.children().collect();
        let parents: Vec<_> = place.parents().collect();

        for path in paths {
            self.detach_path(path);
        }
        for child in children {
            if let Some(c) = self.places.get_mut(&child) {
                c.parents.remove(&id);
            }
        }
        for parent in parents {
            if let Some(p) = self.places.get_mut(&parent) {
                p.children.remove(&id);
            }
        }
        if let Some(place) = self.places.get_mut(&id) {
            place.clear_connections();
        }
    }

    // =========================================================================
    // Layers
    // =========================================================================

    /// Gets a layer.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    /// Iterates over all layers ordered by id.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> + '_ {
        self.layers.values()
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer> {
        self.layers
            .get_mut(&id)
            .ok_or_else(|| Error::layer_not_found(id))
    }

    /// Adds an empty layer. An existing layer with the same id is kept.
    ///
    /// Returns true if the layer was added.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the layer isn't empty.
    pub fn add_layer(&mut self, layer: Layer) -> Result<bool> {
        if !layer.is_empty() {
            return Err(Error::invalid_argument(
                "only empty layers can be added; put places through the world",
            ));
        }
        let id = layer.id();
        if self.layers.contains_key(&id) {
            return Ok(false);
        }
        self.layers.insert(id, layer);
        self.notify(ChangeSource::Layer(id));
        Ok(true)
    }

    /// Creates an empty layer with the id after the highest one in use.
    ///
    /// If the highest layer holds the largest id, the first free id from
    /// layer 0 upwards is used instead.
    ///
    /// # Errors
    ///
    /// Returns `IdsExhausted` if no layer id is free.
    pub fn new_layer(&mut self, name: Option<&str>) -> Result<LayerId> {
        let id = match self.layers.keys().next_back() {
            None => LayerId::first(),
            Some(last) => last
                .successor()
                .or_else(|| free_id(&self.layers, LayerId::first()))
                .ok_or_else(|| Error::ids_exhausted("layer"))?,
        };
        let mut layer = Layer::new(id);
        layer.set_name(name.map(str::to_string));
        self.layers.insert(id, layer);
        self.notify(ChangeSource::Layer(id));
        Ok(id)
    }

    /// Renames a layer; an empty name clears it.
    ///
    /// # Errors
    ///
    /// Returns `LayerNotFound` if the layer doesn't exist.
    pub fn rename_layer(&mut self, id: LayerId, name: Option<&str>) -> Result<()> {
        self.layer_mut(id)?.set_name(name.map(str::to_string));
        self.notify(ChangeSource::Layer(id));
        Ok(())
    }

    /// Removes an empty layer.
    ///
    /// # Errors
    ///
    /// - `LayerNotFound` if the layer doesn't exist
    /// - `InvalidArgument` if places still stand on it
    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer> {
        let layer = self.layers.get(&id).ok_or_else(|| Error::layer_not_found(id))?;
        if !layer.is_empty() {
            return Err(Error::invalid_argument(format!(
                "{id} still holds {} places",
                layer.len()
            )));
        }
        let layer = self.layers.remove(&id).ok_or_else(|| Error::layer_not_found(id))?;
        self.notify(ChangeSource::Layer(id));
        Ok(layer)
    }

    // =========================================================================
    // Risk levels
    // =========================================================================

    /// Gets a risk level.
    #[must_use]
    pub fn risk_level(&self, id: RiskLevelId) -> Option<&RiskLevel> {
        self.risk_levels.get(&id)
    }

    /// Iterates over all risk levels ordered by id.
    pub fn risk_levels(&self) -> impl Iterator<Item = &RiskLevel> + '_ {
        self.risk_levels.values()
    }

    /// Adds a risk level, moving it to the next free id if its id is taken.
    ///
    /// Returns the id it was stored under.
    ///
    /// # Errors
    ///
    /// Returns `IdsExhausted` if no risk level id is free.
    pub fn add_risk_level(&mut self, mut level: RiskLevel) -> Result<RiskLevelId> {
        let id = free_id(&self.risk_levels, level.id)
            .ok_or_else(|| Error::ids_exhausted("risk level"))?;
        level.id = id;
        self.risk_levels.insert(id, level);
        self.notify(ChangeSource::RiskLevel(id));
        Ok(id)
    }

    /// Removes a risk level and clears it from every place using it.
    ///
    /// # Errors
    ///
    /// Returns `RiskLevelNotFound` if the risk level doesn't exist.
    pub fn remove_risk_level(&mut self, id: RiskLevelId) -> Result<RiskLevel> {
        let level = self
            .risk_levels
            .remove(&id)
            .ok_or_else(|| Error::risk_level_not_found(id))?;
        let users: Vec<_> = self
            .places
            .values()
            .filter(|p| p.risk_level() == Some(id))
            .map(Place::id)
            .collect();
        for user in users {
            if let Some(place) = self.places.get_mut(&user) {
                place.set_risk_level(None);
            }
        }
        self.notify(ChangeSource::RiskLevel(id));
        Ok(level)
    }

    fn adopt_risk_level(&mut self, level: RiskLevel) -> Result<RiskLevelId> {
        match self
            .risk_levels
            .values()
            .find(|existing| existing.description == level.description)
        {
            Some(existing) => Ok(existing.id),
            None => self.add_risk_level(level),
        }
    }

    // =========================================================================
    // Areas
    // =========================================================================

    /// Gets an area.
    #[must_use]
    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas.get(&id)
    }

    /// Finds an area by name.
    #[must_use]
    pub fn area_by_name(&self, name: &str) -> Option<&Area> {
        self.areas.values().find(|area| area.name == name)
    }

    /// Returns all areas sorted by name.
    #[must_use]
    pub fn areas(&self) -> Vec<&Area> {
        let mut areas: Vec<_> = self.areas.values().collect();
        areas.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        areas
    }

    /// Adds an area, moving it to the next free id if its id is taken.
    ///
    /// Returns the id it was stored under.
    ///
    /// # Errors
    ///
    /// Returns `IdsExhausted` if no area id is free.
    pub fn add_area(&mut self, mut area: Area) -> Result<AreaId> {
        let id = free_id(&self.areas, area.id).ok_or_else(|| Error::ids_exhausted("area"))?;
        area.id = id;
        self.areas.insert(id, area);
        self.notify(ChangeSource::Area(id));
        Ok(id)
    }

    /// Removes an area and clears it from every place in it.
    ///
    /// # Errors
    ///
    /// Returns `AreaNotFound` if the area doesn't exist.
    pub fn remove_area(&mut self, id: AreaId) -> Result<Area> {
        let area = self
            .areas
            .remove(&id)
            .ok_or_else(|| Error::area_not_found(id))?;
        let members: Vec<_> = self
            .places
            .values()
            .filter(|p| p.area() == Some(id))
            .map(Place::id)
            .collect();
        for member in members {
            if let Some(place) = self.places.get_mut(&member) {
                place.set_area(None);
            }
        }
        self.notify(ChangeSource::Area(id));
        Ok(area)
    }

    fn adopt_area(&mut self, area: Area) -> Result<AreaId> {
        match self.area_by_name(&area.name) {
            Some(existing) => Ok(existing.id),
            None => self.add_area(area),
        }
    }

    // =========================================================================
    // Consistency
    // =========================================================================

    /// Verifies every structural invariant of the world.
    ///
    /// # Errors
    ///
    /// Returns an `Internal` error describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        for place in self.places.values() {
            let id = place.id();
            self.check_indexed(place)?;
            self.check_tags(place)?;
            for path_id in place.paths() {
                let path = self
                    .paths
                    .get(path_id)
                    .ok_or_else(|| Error::internal(format!("{id:?} lists unknown {path_id:?}")))?;
                if !path.has_place(id) {
                    return Err(Error::internal(format!("{path_id:?} doesn't touch {id:?}")));
                }
            }
            for child in place.children() {
                if !self.places.get(&child).is_some_and(|c| c.has_parent(id)) {
                    return Err(Error::internal(format!("{child:?} doesn't list parent {id:?}")));
                }
            }
            for parent in place.parents() {
                if !self.places.get(&parent).is_some_and(|p| p.has_child(id)) {
                    return Err(Error::internal(format!("{parent:?} doesn't list child {id:?}")));
                }
            }
        }

        for layer in self.layers.values() {
            for (x, y, id) in layer.iter() {
                let placed = self.places.get(&id).and_then(Place::placement);
                if placed != Some(Placement::new(layer.id(), x, y)) {
                    return Err(Error::internal(format!(
                        "{} cell {x}, {y} holds {id:?} which stands elsewhere",
                        layer.id()
                    )));
                }
            }
        }

        for (path_id, path) in self.paths.iter() {
            for endpoint in path.places() {
                if !self
                    .places
                    .get(&endpoint)
                    .is_some_and(|p| p.paths().contains(path_id))
                {
                    return Err(Error::internal(format!(
                        "{path_id:?} is not registered on {endpoint:?}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of listeners registered.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Finds the first id at or after `from` that isn't a key of `map`,
/// wrapping around to the first id of the kind at the end of the range.
fn free_id<I: SequentialId, V>(map: &OrdMap<I, V>, from: I) -> Option<I> {
    fn scan<I: SequentialId, V>(map: &OrdMap<I, V>, mut id: I) -> Option<I> {
        while map.contains_key(&id) {
            id = id.successor()?;
        }
        Some(id)
    }
    scan(map, from).or_else(|| scan(map, I::first()))
}
