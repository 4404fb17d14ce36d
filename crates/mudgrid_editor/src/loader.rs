//! Incremental world construction from records.
//!
//! Tags, layers and places are applied as they arrive. Paths and sub-area
//! links may name places that haven't been read yet, so they are buffered
//! and connected once every place exists.

use mudgrid_foundation::{Coordinate, Error, ErrorContext, PlaceId, Result};
use mudgrid_storage::{Area, ConnectOutcome, Layer, RiskLevel, World, WorldConfig};
use tracing::debug;

use crate::record::{ChildRecord, LayerRecord, PathRecord, PlaceRecord};

/// Builds a [`World`] from records read in any order.
#[derive(Debug)]
pub struct WorldLoader {
    world: World,
    places_read: usize,
    pending_paths: Vec<PathRecord>,
    pending_children: Vec<ChildRecord>,
}

impl WorldLoader {
    /// Starts loading a world without risk levels.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            world: World::empty(name),
            places_read: 0,
            pending_paths: Vec::new(),
            pending_children: Vec::new(),
        }
    }

    /// Sets the home position.
    pub fn set_home(&mut self, home: Coordinate) {
        self.world.set_home(home);
    }

    /// Sets the display configuration.
    pub fn set_config(&mut self, config: WorldConfig) {
        self.world.set_config(config);
    }

    /// Adds a risk level under its own id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the id was already read.
    pub fn add_risk_level(&mut self, level: RiskLevel) -> Result<()> {
        let id = level.id;
        if self.world.risk_level(id).is_some() {
            return Err(Error::invalid_argument(format!("risk level {} read twice", id.get()))
                .with_context(ErrorContext::new().with_source("risk level record")));
        }
        self.world.add_risk_level(level)?;
        Ok(())
    }

    /// Adds an area under its own id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the id was already read.
    pub fn add_area(&mut self, area: Area) -> Result<()> {
        let id = area.id;
        if self.world.area(id).is_some() {
            return Err(Error::invalid_argument(format!("area {} read twice", id.get()))
                .with_context(ErrorContext::new().with_source("area record")));
        }
        self.world.add_area(area)?;
        Ok(())
    }

    /// Adds a layer, or names it if a place record already created it.
    ///
    /// # Errors
    ///
    /// Only fails if the world is inconsistent.
    pub fn add_layer(&mut self, record: &LayerRecord) -> Result<()> {
        if self.world.layer(record.id).is_some() {
            return self.world.rename_layer(record.id, record.name.as_deref());
        }
        let mut layer = Layer::new(record.id);
        layer.set_name(record.name.clone());
        self.world.add_layer(layer)?;
        Ok(())
    }

    /// Puts a place on the map.
    ///
    /// # Errors
    ///
    /// Fails like [`World::put_place`], with the record's position in the
    /// place sequence attached as context.
    pub fn add_place(&mut self, record: &PlaceRecord) -> Result<PlaceId> {
        let index = self.places_read;
        self.places_read += 1;
        self.world
            .put_place(record.to_place(), record.layer, record.x, record.y)
            .map_err(|e| {
                e.with_context(
                    ErrorContext::new()
                        .with_source("place record")
                        .with_index(index),
                )
            })
    }

    /// Buffers a path until [`WorldLoader::finish`].
    pub fn add_path(&mut self, record: PathRecord) {
        self.pending_paths.push(record);
    }

    /// Buffers a sub-area link until [`WorldLoader::finish`].
    pub fn add_child(&mut self, record: ChildRecord) {
        self.pending_children.push(record);
    }

    /// Number of places read so far.
    #[must_use]
    pub fn places_read(&self) -> usize {
        self.places_read
    }

    /// Connects the buffered paths and links and returns the world.
    ///
    /// # Errors
    ///
    /// - `PlaceNotFound` if a record names a place that was never read
    /// - `InvalidArgument` if a path uses an exit that is already taken
    /// - `SelfLoopConflict` for a path joining one exit to itself
    ///
    /// The context names the failing record.
    pub fn finish(mut self) -> Result<World> {
        debug!(
            paths = self.pending_paths.len(),
            children = self.pending_children.len(),
            "connecting deferred records"
        );

        for (index, record) in self.pending_paths.iter().enumerate() {
            let context = || ErrorContext::new().with_source("path record").with_index(index);
            let outcome = self
                .world
                .connect_path(record.a, record.to_path())
                .map_err(|e| e.with_context(context()))?;
            if let ConnectOutcome::ExitOccupied { place, exit, .. } = outcome {
                return Err(Error::invalid_argument(format!(
                    "exit {exit} of {place} is used by two paths"
                ))
                .with_context(context()));
            }
        }

        for (index, record) in self.pending_children.iter().enumerate() {
            self.world
                .connect_child(record.parent, record.child)
                .map_err(|e| {
                    e.with_context(
                        ErrorContext::new()
                            .with_source("child record")
                            .with_index(index),
                    )
                })?;
        }

        Ok(self.world)
    }
}
