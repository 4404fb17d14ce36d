//! Places: the nodes of the world graph.
//!
//! A place carries its descriptive attributes and the ids of everything it
//! is connected to. Connections are only changed through the
//! [`World`](crate::World), which keeps both sides of every link in step.

use std::collections::BTreeMap;
use std::fmt;

use im::OrdSet;
use mudgrid_foundation::{AreaId, LayerId, PathId, PlaceId, RiskLevelId};

use crate::layer::{LayerElement, Placement};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What kind of place this is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlaceKind {
    /// A regular, described place.
    #[default]
    Normal,
    /// A nameless marker reserving a cell until the place is described.
    Placeholder,
}

/// A place (room) in the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Place {
    id: PlaceId,
    name: String,
    kind: PlaceKind,
    placement: Option<Placement>,
    area: Option<AreaId>,
    rec_level_min: Option<u32>,
    rec_level_max: Option<u32>,
    risk_level: Option<RiskLevelId>,
    comments: String,
    flags: BTreeMap<String, bool>,
    pub(crate) children: OrdSet<PlaceId>,
    pub(crate) parents: OrdSet<PlaceId>,
    /// Connected paths in the order they were connected.
    pub(crate) paths: Vec<PathId>,
}

impl Place {
    /// Name shown for placeholders.
    pub const PLACEHOLDER_NAME: &'static str = "?";

    /// Creates an unplaced place without connections.
    #[must_use]
    pub fn new(id: PlaceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: PlaceKind::Normal,
            placement: None,
            area: None,
            rec_level_min: None,
            rec_level_max: None,
            risk_level: None,
            comments: String::new(),
            flags: BTreeMap::new(),
            children: OrdSet::new(),
            parents: OrdSet::new(),
            paths: Vec::new(),
        }
    }

    /// Creates an unplaced placeholder.
    #[must_use]
    pub fn placeholder(id: PlaceId) -> Self {
        Self {
            kind: PlaceKind::Placeholder,
            ..Self::new(id, String::new())
        }
    }

    /// Returns the id.
    #[must_use]
    pub fn id(&self) -> PlaceId {
        self.id
    }

    /// Returns the name; placeholders show [`Place::PLACEHOLDER_NAME`].
    #[must_use]
    pub fn name(&self) -> &str {
        if self.kind == PlaceKind::Placeholder && self.name.is_empty() {
            Self::PLACEHOLDER_NAME
        } else {
            &self.name
        }
    }

    /// Sets the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the kind.
    #[must_use]
    pub fn kind(&self) -> PlaceKind {
        self.kind
    }

    /// Returns true for placeholders.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.kind == PlaceKind::Placeholder
    }

    /// Turns a placeholder into a regular place, or back.
    pub fn set_kind(&mut self, kind: PlaceKind) {
        self.kind = kind;
    }

    /// Returns the layer the place stands on.
    #[must_use]
    pub fn layer(&self) -> Option<LayerId> {
        self.placement.map(|p| p.layer)
    }

    /// Returns the x position, if placed.
    #[must_use]
    pub fn x(&self) -> Option<i32> {
        self.placement.map(|p| p.x)
    }

    /// Returns the y position, if placed.
    #[must_use]
    pub fn y(&self) -> Option<i32> {
        self.placement.map(|p| p.y)
    }

    /// Returns the area.
    #[must_use]
    pub fn area(&self) -> Option<AreaId> {
        self.area
    }

    /// Sets the area.
    pub fn set_area(&mut self, area: Option<AreaId>) {
        self.area = area;
    }

    /// Returns the minimum recommended level.
    #[must_use]
    pub fn rec_level_min(&self) -> Option<u32> {
        self.rec_level_min
    }

    /// Returns the maximum recommended level.
    #[must_use]
    pub fn rec_level_max(&self) -> Option<u32> {
        self.rec_level_max
    }

    /// Sets the recommended level range; `None` leaves a bound unset.
    pub fn set_rec_levels(&mut self, min: Option<u32>, max: Option<u32>) {
        self.rec_level_min = min;
        self.rec_level_max = max;
    }

    /// Returns the risk level.
    #[must_use]
    pub fn risk_level(&self) -> Option<RiskLevelId> {
        self.risk_level
    }

    /// Sets the risk level.
    pub fn set_risk_level(&mut self, risk_level: Option<RiskLevelId>) {
        self.risk_level = risk_level;
    }

    /// Returns the comments.
    #[must_use]
    pub fn comments(&self) -> &str {
        &self.comments
    }

    /// Sets the comments.
    pub fn set_comments(&mut self, comments: impl Into<String>) {
        self.comments = comments.into();
    }

    /// Gets a flag; unknown flags are false.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    /// Sets a flag.
    pub fn set_flag(&mut self, key: impl Into<String>, state: bool) {
        self.flags.insert(key.into(), state);
    }

    /// Returns all flags.
    #[must_use]
    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    /// Returns the sub-areas of this place.
    pub fn children(&self) -> impl Iterator<Item = PlaceId> + '_ {
        self.children.iter().copied()
    }

    /// Returns the places this place is a sub-area of.
    pub fn parents(&self) -> impl Iterator<Item = PlaceId> + '_ {
        self.parents.iter().copied()
    }

    /// Returns true if `place` is a sub-area of this place.
    #[must_use]
    pub fn has_child(&self, place: PlaceId) -> bool {
        self.children.contains(&place)
    }

    /// Returns true if this place is a sub-area of `place`.
    #[must_use]
    pub fn has_parent(&self, place: PlaceId) -> bool {
        self.parents.contains(&place)
    }

    /// Returns the connected paths in connection order.
    #[must_use]
    pub fn paths(&self) -> &[PathId] {
        &self.paths
    }

    /// Returns true if the place has no paths and no sub-area links.
    #[must_use]
    pub fn is_unconnected(&self) -> bool {
        self.paths.is_empty() && self.children.is_empty() && self.parents.is_empty()
    }

    /// Returns true if every keyword occurs in the name or the comments,
    /// ignoring case.
    ///
    /// An empty keyword list matches nothing.
    #[must_use]
    pub fn matches_keywords<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        if keywords.is_empty() {
            return false;
        }
        let name = self.name().to_lowercase();
        let comments = self.comments.to_lowercase();
        keywords.iter().all(|keyword| {
            let keyword = keyword.as_ref().to_lowercase();
            name.contains(&keyword) || comments.contains(&keyword)
        })
    }

    /// Creates a copy with a new id.
    ///
    /// The copy keeps name, kind, area, levels, risk level, comments and
    /// flags, but has no position and no connections.
    #[must_use]
    pub fn duplicate(&self, id: PlaceId) -> Self {
        Self {
            id,
            name: self.name.clone(),
            kind: self.kind,
            area: self.area,
            rec_level_min: self.rec_level_min,
            rec_level_max: self.rec_level_max,
            risk_level: self.risk_level,
            comments: self.comments.clone(),
            flags: self.flags.clone(),
            ..Self::new(id, String::new())
        }
    }

    pub(crate) fn clear_connections(&mut self) {
        self.paths.clear();
        self.children.clear();
        self.parents.clear();
    }
}

impl LayerElement for Place {
    fn element_id(&self) -> PlaceId {
        self.id
    }

    fn placement(&self) -> Option<Placement> {
        self.placement
    }

    fn set_placement(&mut self, placement: Option<Placement>) {
        self.placement = placement;
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name(), self.id.get())
    }
}
