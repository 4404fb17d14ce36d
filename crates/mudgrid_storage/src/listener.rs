//! Change notification.
//!
//! Listeners are called synchronously after each successful mutation, once
//! per mutation. A listener must not mutate the world from inside the
//! callback.

use std::fmt;
use std::sync::Arc;

use mudgrid_foundation::{AreaId, LayerId, PlaceId, RiskLevelId};

/// What a mutation changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChangeSource {
    /// World-wide settings (name, home, colors).
    World,
    /// A place, including its paths and sub-area links.
    Place(PlaceId),
    /// A layer.
    Layer(LayerId),
    /// A risk level.
    RiskLevel(RiskLevelId),
    /// An area.
    Area(AreaId),
}

/// Receives change notifications from a [`World`](crate::World).
pub trait WorldListener {
    /// Called after a mutation succeeded.
    fn world_changed(&self, source: &ChangeSource);
}

impl<F> WorldListener for F
where
    F: Fn(&ChangeSource),
{
    fn world_changed(&self, source: &ChangeSource) {
        self(source);
    }
}

/// Handle for removing a registered listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// The registered listeners of a world.
#[derive(Clone, Default)]
pub(crate) struct Listeners {
    next: u64,
    entries: Vec<(ListenerId, Arc<dyn WorldListener>)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Arc<dyn WorldListener>) -> ListenerId {
        if let Some((id, _)) = self
            .entries
            .iter()
            .find(|(_, existing)| Arc::ptr_eq(existing, &listener))
        {
            return *id;
        }
        let id = ListenerId(self.next);
        self.next += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&self, source: ChangeSource) {
        for (_, listener) in &self.entries {
            listener.world_changed(&source);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
