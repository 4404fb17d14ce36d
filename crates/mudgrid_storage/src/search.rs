//! Breadth-first shortest path search over the place graph.
//!
//! Paths are undirected and unweighted. Edges are visited in each place's
//! connection order, so ties between equally short routes always resolve
//! the same way.

use std::collections::{HashMap, HashSet, VecDeque};

use mudgrid_foundation::{Error, PlaceId, Result};

use crate::world::World;

/// The outcome of a successful breadth search.
///
/// Holds the predecessor of every place reached before the search stopped,
/// which is enough to walk back from the end to the start.
#[derive(Clone, Debug)]
pub struct SearchResult {
    start: PlaceId,
    end: PlaceId,
    predecessors: HashMap<PlaceId, PlaceId>,
}

impl SearchResult {
    /// The place the search started at.
    #[must_use]
    pub fn start(&self) -> PlaceId {
        self.start
    }

    /// The place that was searched for.
    #[must_use]
    pub fn end(&self) -> PlaceId {
        self.end
    }

    /// The place a reached place was discovered from.
    #[must_use]
    pub fn predecessor(&self, place: PlaceId) -> Option<PlaceId> {
        self.predecessors.get(&place).copied()
    }

    /// The route from start to end, both included.
    #[must_use]
    pub fn route(&self) -> Vec<PlaceId> {
        let mut route = vec![self.end];
        let mut current = self.end;
        while let Some(previous) = self.predecessor(current) {
            route.push(previous);
            current = previous;
        }
        route.reverse();
        route
    }

    /// Number of paths walked along the route.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.route().len() - 1
    }
}

impl World {
    /// Finds a shortest route from `start` to `end`.
    ///
    /// Returns `Ok(None)` if `end` can't be reached.
    ///
    /// # Errors
    ///
    /// Returns `PlaceNotFound` if either place isn't in the world.
    pub fn breadth_search(&self, start: PlaceId, end: PlaceId) -> Result<Option<SearchResult>> {
        self.place(start).ok_or_else(|| Error::place_not_found(start))?;
        self.place(end).ok_or_else(|| Error::place_not_found(end))?;

        let mut predecessors = HashMap::new();
        let mut marked = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if current == end {
                return Ok(Some(SearchResult {
                    start,
                    end,
                    predecessors,
                }));
            }

            for neighbor in self.neighbors_of(current) {
                if neighbor != current && marked.insert(neighbor) {
                    predecessors.insert(neighbor, current);
                    queue.push_back(neighbor);
                }
            }
        }

        Ok(None)
    }

    /// Places reachable over one path, in connection order.
    fn neighbors_of(&self, place: PlaceId) -> Vec<PlaceId> {
        self.place(place)
            .map(|p| {
                p.paths()
                    .iter()
                    .filter_map(|id| self.path(*id))
                    .filter_map(|path| path.other_place(place))
                    .collect()
            })
            .unwrap_or_default()
    }
}
