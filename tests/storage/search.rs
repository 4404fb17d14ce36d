//! Integration tests for breadth search
//!
//! Tests shortest routes, unreachable targets, and deterministic ties.

use mudgrid_foundation::{Direction, LayerId, PlaceId};
use mudgrid_storage::{Path, World};
use proptest::prelude::*;

fn line(world: &mut World, n: i32) -> Vec<PlaceId> {
    let ids: Vec<_> = (0..n)
        .map(|x| {
            let place = world.new_place(format!("room {x}"));
            world.put_place(place, LayerId(0), x, 0).unwrap()
        })
        .collect();
    for pair in ids.windows(2) {
        let path = Path::new(pair[0], Direction::East, pair[1], Direction::West);
        assert!(world.connect_path(pair[0], path).unwrap().is_connected());
    }
    ids
}

// =============================================================================
// Routes
// =============================================================================

#[test]
fn five_places_in_a_line() {
    let mut world = World::new("test");
    let ids = line(&mut world, 5);

    let result = world.breadth_search(ids[0], ids[4]).unwrap().unwrap();
    assert_eq!(result.end(), ids[4]);
    assert_eq!(result.route(), ids);
    assert_eq!(result.route().len(), 5);
}

#[test]
fn search_ignores_path_direction() {
    let mut world = World::new("test");
    let ids = line(&mut world, 3);

    let result = world.breadth_search(ids[2], ids[0]).unwrap().unwrap();
    assert_eq!(result.route(), vec![ids[2], ids[1], ids[0]]);
}

#[test]
fn shortcut_wins() {
    let mut world = World::new("test");
    let ids = line(&mut world, 5);
    let tunnel = Path::new(ids[0], Direction::Down, ids[4], Direction::Up);
    assert!(world.connect_path(ids[0], tunnel).unwrap().is_connected());

    let result = world.breadth_search(ids[0], ids[4]).unwrap().unwrap();
    assert_eq!(result.hops(), 1);
}

#[test]
fn ties_follow_connection_order() {
    let mut world = World::new("test");
    let start = world.new_place("start");
    let start = world.put_place(start, LayerId(0), 0, 0).unwrap();
    let north = world.new_place("north");
    let north = world.put_place(north, LayerId(0), 0, 1).unwrap();
    let south = world.new_place("south");
    let south = world.put_place(south, LayerId(0), 0, -1).unwrap();
    let goal = world.new_place("goal");
    let goal = world.put_place(goal, LayerId(0), 1, 0).unwrap();

    for (from, exit, to, back) in [
        (start, Direction::South, south, Direction::North),
        (start, Direction::North, north, Direction::South),
        (north, Direction::SouthEast, goal, Direction::NorthWest),
        (south, Direction::NorthEast, goal, Direction::SouthWest),
    ] {
        assert!(world.connect_path(from, Path::new(from, exit, to, back)).unwrap().is_connected());
    }

    for _ in 0..3 {
        let result = world.breadth_search(start, goal).unwrap().unwrap();
        assert_eq!(result.route(), vec![start, south, goal]);
    }
}

#[test]
fn disconnected_places() {
    let mut world = World::new("test");
    let ids = line(&mut world, 3);
    let removed = world.paths_between(ids[1], ids[2])[0];
    world.remove_path(removed);

    assert!(world.breadth_search(ids[0], ids[2]).unwrap().is_none());
    assert!(world.breadth_search(ids[0], ids[1]).unwrap().is_some());
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn route_length_matches_line_distance(n in 1i32..12, a in 0usize..12, b in 0usize..12) {
        let mut world = World::new("prop");
        let ids = line(&mut world, n);
        let (a, b) = (a % ids.len(), b % ids.len());

        let result = world.breadth_search(ids[a], ids[b]).unwrap().unwrap();
        prop_assert_eq!(result.hops(), a.abs_diff(b));
        prop_assert_eq!(result.route().len(), a.abs_diff(b) + 1);
        prop_assert_eq!(result.route()[0], ids[a]);
    }
}
