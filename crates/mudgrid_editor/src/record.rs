//! Plain-data records of a world, for persistence collaborators.
//!
//! Records mirror the entity attributes one to one and refer to each
//! other by id, so they can be written out in any format and read back
//! through a [`WorldLoader`](crate::WorldLoader).

use std::collections::BTreeMap;

use mudgrid_foundation::{AreaId, Coordinate, Direction, LayerId, PlaceId, Result, RiskLevelId};
use mudgrid_storage::{Area, LayerElement, Path, Place, PlaceKind, RiskLevel, World, WorldConfig};
use serde::{Deserialize, Serialize};

use crate::loader::WorldLoader;

/// A layer and its optional name. Cells are rebuilt from place records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRecord {
    /// Layer id.
    pub id: LayerId,
    /// Display name.
    pub name: Option<String>,
}

/// Every attribute of a placed place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Place id.
    pub id: PlaceId,
    /// Name.
    pub name: String,
    /// Normal place or placeholder.
    #[serde(default)]
    pub kind: PlaceKind,
    /// Layer the place stands on.
    pub layer: LayerId,
    /// Horizontal cell position.
    pub x: i32,
    /// Vertical cell position.
    pub y: i32,
    /// Area, if any.
    pub area: Option<AreaId>,
    /// Lowest recommended level.
    pub rec_level_min: Option<u32>,
    /// Highest recommended level.
    pub rec_level_max: Option<u32>,
    /// Risk level, if any.
    pub risk_level: Option<RiskLevelId>,
    /// Free text.
    #[serde(default)]
    pub comments: String,
    /// Named boolean flags.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
}

impl PlaceRecord {
    /// Captures a placed place. Unplaced places yield `None`.
    #[must_use]
    pub fn capture(place: &Place) -> Option<Self> {
        let at = place.placement()?;
        Some(Self {
            id: place.id(),
            name: place.name().to_string(),
            kind: place.kind(),
            layer: at.layer,
            x: at.x,
            y: at.y,
            area: place.area(),
            rec_level_min: place.rec_level_min(),
            rec_level_max: place.rec_level_max(),
            risk_level: place.risk_level(),
            comments: place.comments().to_string(),
            flags: place.flags().clone(),
        })
    }

    /// Builds the unplaced, unconnected place this record describes.
    #[must_use]
    pub fn to_place(&self) -> Place {
        let mut place = Place::new(self.id, self.name.clone());
        place.set_kind(self.kind);
        place.set_area(self.area);
        place.set_rec_levels(self.rec_level_min, self.rec_level_max);
        place.set_risk_level(self.risk_level);
        place.set_comments(self.comments.clone());
        for (key, state) in &self.flags {
            place.set_flag(key.clone(), *state);
        }
        place
    }
}

/// A path between two place exits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRecord {
    /// First endpoint.
    pub a: PlaceId,
    /// Exit used at the first endpoint.
    pub exit_a: Direction,
    /// Second endpoint.
    pub b: PlaceId,
    /// Exit used at the second endpoint.
    pub exit_b: Direction,
}

impl PathRecord {
    /// Captures a path.
    #[must_use]
    pub fn capture(path: &Path) -> Self {
        let [a, b] = path.places();
        let [exit_a, exit_b] = path.exits().clone();
        Self { a, exit_a, b, exit_b }
    }

    /// Builds the path this record describes.
    #[must_use]
    pub fn to_path(&self) -> Path {
        Path::new(self.a, self.exit_a.clone(), self.b, self.exit_b.clone())
    }
}

/// A parent/child sub-area link.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRecord {
    /// The enclosing place.
    pub parent: PlaceId,
    /// The place inside it.
    pub child: PlaceId,
}

/// A whole world as plain records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldRecord {
    /// World name.
    pub name: String,
    /// Home position.
    pub home: Coordinate,
    /// Display configuration.
    #[serde(default)]
    pub config: WorldConfig,
    /// Risk levels.
    pub risk_levels: Vec<RiskLevel>,
    /// Areas.
    pub areas: Vec<Area>,
    /// Layers, including empty ones.
    pub layers: Vec<LayerRecord>,
    /// Places.
    pub places: Vec<PlaceRecord>,
    /// Paths.
    pub paths: Vec<PathRecord>,
    /// Sub-area links.
    pub children: Vec<ChildRecord>,
}

impl WorldRecord {
    /// Captures the state of a world. Listeners are not part of it.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        Self {
            name: world.name().to_string(),
            home: world.home(),
            config: world.config().clone(),
            risk_levels: world.risk_levels().cloned().collect(),
            areas: world.areas().into_iter().cloned().collect(),
            layers: world
                .layers()
                .map(|layer| LayerRecord {
                    id: layer.id(),
                    name: layer.name().map(str::to_string),
                })
                .collect(),
            places: world.places().filter_map(PlaceRecord::capture).collect(),
            paths: world.paths().map(|(_, path)| PathRecord::capture(path)).collect(),
            children: world
                .places()
                .flat_map(|p| p.children().map(move |child| ChildRecord { parent: p.id(), child }))
                .collect(),
        }
    }

    /// Rebuilds the world these records describe.
    ///
    /// # Errors
    ///
    /// Fails on the first record that doesn't fit, with an
    /// [`ErrorContext`](mudgrid_foundation::ErrorContext) naming it.
    pub fn restore(&self) -> Result<World> {
        let mut loader = WorldLoader::new(self.name.clone());
        loader.set_home(self.home);
        loader.set_config(self.config.clone());
        for level in &self.risk_levels {
            loader.add_risk_level(level.clone())?;
        }
        for area in &self.areas {
            loader.add_area(area.clone())?;
        }
        for layer in &self.layers {
            loader.add_layer(layer)?;
        }
        for place in &self.places {
            loader.add_place(place)?;
        }
        for path in &self.paths {
            loader.add_path(path.clone());
        }
        for link in &self.children {
            loader.add_child(*link);
        }
        loader.finish()
    }
}
