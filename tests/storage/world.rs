//! Integration tests for world state
//!
//! Tests placement, removal, tags, layers, listeners, and snapshots.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use mudgrid_foundation::{AreaId, Color, Coordinate, Direction, ErrorKind, LayerId, PlaceId, RiskLevelId};
use mudgrid_storage::{
    Area, ChangeSource, Layer, LayerElement, Path, RiskLevel, ShowPlaceId, World, WorldConfig,
};
use proptest::prelude::*;

fn put(world: &mut World, name: &str, layer: i32, x: i32, y: i32) -> PlaceId {
    let place = world.new_place(name);
    world.put_place(place, LayerId(layer), x, y).unwrap()
}

// =============================================================================
// Placement
// =============================================================================

#[test]
fn occupied_cell_keeps_original_occupant() {
    let mut world = World::new("test");
    let original = put(&mut world, "original", 0, 0, 0);
    let newcomer = world.new_place("newcomer");

    assert!(world.put_place(newcomer, LayerId(0), 0, 0).is_err());
    let layer = world.layer(LayerId(0)).unwrap();
    assert!(layer.exists(0, 0));
    assert_eq!(layer.get(0, 0), Some(original));
}

#[test]
fn put_place_creates_layers_on_demand() {
    let mut world = World::new("test");
    put(&mut world, "deep", -3, 0, 0);
    assert!(world.layer(LayerId(-3)).is_some());
    assert_eq!(world.layers().count(), 1);
}

#[test]
fn move_between_layers() {
    let mut world = World::new("test");
    let a = put(&mut world, "a", 0, 0, 0);
    world.move_place(a, LayerId(1), 4, 4).unwrap();

    assert!(world.layer(LayerId(0)).unwrap().is_empty());
    assert_eq!(world.place(a).unwrap().layer(), Some(LayerId(1)));
    world.validate().unwrap();
}

#[test]
fn move_onto_occupied_cell_fails() {
    let mut world = World::new("test");
    let a = put(&mut world, "a", 0, 0, 0);
    let b = put(&mut world, "b", 0, 1, 0);

    let err = world.move_place(a, LayerId(0), 1, 0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PositionOccupied { occupant, .. } if occupant == b));
    assert_eq!(world.place(a).unwrap().x(), Some(0));
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn removal_leaves_no_references() {
    let mut world = World::new("test");
    let hub = put(&mut world, "hub", 0, 0, 0);
    let spokes: Vec<_> = Direction::COMPASS
        .iter()
        .map(|dir| {
            let (dx, dy) = dir.offset().unwrap();
            let spoke = put(&mut world, "spoke", 0, dx, dy);
            let path = Path::new(hub, dir.clone(), spoke, dir.opposite().unwrap());
            assert!(world.connect_path(hub, path).unwrap().is_connected());
            spoke
        })
        .collect();
    world.connect_child(hub, spokes[0]).unwrap();
    world.connect_child(spokes[1], hub).unwrap();

    world.remove_place(hub).unwrap();

    for spoke in &spokes {
        let place = world.place(*spoke).unwrap();
        assert!(place.is_unconnected());
    }
    assert!(!world.layer(LayerId(0)).unwrap().exists(0, 0));
    assert!(world.place(hub).is_none());
    world.validate().unwrap();
}

#[test]
fn remove_missing_place() {
    let mut world = World::new("test");
    assert!(world.remove_place(PlaceId(5)).unwrap_err().is_not_found());
}

// =============================================================================
// Placeholders
// =============================================================================

#[test]
fn placeholder_ignores_occupied_cells() {
    let mut world = World::new("test");
    put(&mut world, "real", 0, 0, 0);
    assert_eq!(world.put_placeholder(LayerId(0), 0, 0), None);
    assert_eq!(world.place_count(), 1);
}

#[test]
fn placeholder_without_risk_levels() {
    let mut world = World::empty("bare");
    let id = world.put_placeholder(LayerId(0), 1, 1).unwrap();
    let place = world.place(id).unwrap();
    assert_eq!(place.risk_level(), None);
    assert!(place.area().is_some());
}

// =============================================================================
// Risk Levels and Areas
// =============================================================================

#[test]
fn default_risk_levels() {
    let world = World::new("test");
    let descriptions: Vec<_> = world.risk_levels().map(|r| r.description.as_str()).collect();
    assert_eq!(
        descriptions,
        vec!["not evaluated", "safe", "mobs don't attack", "mobs might attack", "mobs will attack"]
    );
}

#[test]
fn colliding_ids_are_bumped() {
    let mut world = World::new("test");
    let first = world.add_area(Area::new(AreaId(1), "Docks", Color::GRAY)).unwrap();
    let second = world.add_area(Area::new(AreaId(1), "Market", Color::YELLOW)).unwrap();
    assert_eq!(first, AreaId(1));
    assert_eq!(second, AreaId(2));
    assert_eq!(world.area_by_name("Market").unwrap().id, AreaId(2));

    let level = world
        .add_risk_level(RiskLevel::new(RiskLevelId(0), "haunted", Color::RED))
        .unwrap();
    assert_eq!(level, RiskLevelId(5));
}

#[test]
fn taken_largest_tag_id_does_not_hang() {
    let mut world = World::new("test");
    let last = RiskLevelId(u32::MAX);
    world.add_risk_level(RiskLevel::new(last, "cursed", Color::RED)).unwrap();
    let moved = world
        .add_risk_level(RiskLevel::new(last, "doomed", Color::RED))
        .unwrap();

    // 0 to 4 hold the defaults
    assert_eq!(moved, RiskLevelId(5));
    assert_eq!(world.risk_level(last).unwrap().description, "cursed");
    assert_eq!(world.risk_levels().count(), 7);
}

#[test]
fn removing_a_risk_level_clears_places() {
    let mut world = World::new("test");
    let a = put(&mut world, "a", 0, 0, 0);
    world.modify_place(a, |p| p.set_risk_level(Some(RiskLevelId(2)))).unwrap();

    world.remove_risk_level(RiskLevelId(2)).unwrap();
    assert_eq!(world.place(a).unwrap().risk_level(), None);
    assert!(world.risk_level(RiskLevelId(2)).is_none());
}

// =============================================================================
// Layers
// =============================================================================

#[test]
fn empty_layers_persist() {
    let mut world = World::new("test");
    let a = put(&mut world, "a", 0, 0, 0);
    world.remove_place(a).unwrap();
    assert!(world.layer(LayerId(0)).is_some());

    world.remove_layer(LayerId(0)).unwrap();
    assert!(world.layer(LayerId(0)).is_none());
    assert!(world.remove_layer(LayerId(0)).unwrap_err().is_not_found());
}

#[test]
fn new_layer_follows_highest() {
    let mut world = World::new("test");
    world.add_layer(Layer::new(LayerId(4))).unwrap();
    assert_eq!(world.new_layer(Some("attic")).unwrap(), LayerId(5));
    world.rename_layer(LayerId(5), None).unwrap();
    assert_eq!(world.layer(LayerId(5)).unwrap().name(), None);
}

#[test]
fn new_layer_after_the_largest_id_keeps_its_places() {
    let mut world = World::new("test");
    let top = put(&mut world, "top", i32::MAX, 0, 0);

    let fresh = world.new_layer(Some("fresh")).unwrap();
    assert_ne!(fresh, LayerId(i32::MAX));
    assert_eq!(world.layer(LayerId(i32::MAX)).unwrap().len(), 1);
    assert_eq!(world.place_at(LayerId(i32::MAX), 0, 0).map(|p| p.id()), Some(top));
    world.validate().unwrap();
}

// =============================================================================
// Settings and Labels
// =============================================================================

#[test]
fn path_colors_by_exit_kind() {
    let mut world = World::new("test");
    world.set_config(
        WorldConfig::default()
            .with_path_color_cardinal(Color::GRAY)
            .with_path_color_non_cardinal(Color::ORANGE),
    );
    world.set_path_color(Direction::Up, Color::RED);

    assert_eq!(world.path_color(&Direction::West), Color::GRAY);
    assert_eq!(world.path_color(&Direction::Down), Color::ORANGE);
    assert_eq!(world.path_color(&Direction::Up), Color::RED);
}

#[test]
fn labels_disambiguate_duplicates() {
    let mut world = World::new("test");
    let a = put(&mut world, "Road", 0, 0, 0);
    let b = put(&mut world, "Road", 0, 1, 0);
    assert_eq!(world.place_label(a).unwrap(), format!("Road (ID: {})", a.get()));

    world.remove_place(b).unwrap();
    assert_eq!(world.place_label(a).unwrap(), "Road");

    world.set_config(WorldConfig::default().with_show_place_id(ShowPlaceId::All));
    assert_eq!(world.place_label(a).unwrap(), format!("Road (ID: {})", a.get()));
}

#[test]
fn home_position() {
    let mut world = World::new("test");
    world.set_home(Coordinate::new(LayerId(2), 3.0, 4.0));
    assert_eq!(world.home().layer, LayerId(2));
    assert_eq!(world.home().tile(), (3, 4));
}

// =============================================================================
// Listeners and Snapshots
// =============================================================================

#[test]
fn listeners_see_each_mutation_once() {
    let mut world = World::new("test");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = world.add_listener(Arc::new(move |s: &ChangeSource| sink.borrow_mut().push(*s)));

    let a = put(&mut world, "a", 0, 0, 0);
    world.new_layer(None).unwrap();
    let area = world.add_area(Area::new(AreaId(0), "Harbor", Color::GRAY)).unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![
            ChangeSource::Place(a),
            ChangeSource::Layer(LayerId(1)),
            ChangeSource::Area(area),
        ]
    );

    assert!(world.remove_listener(id));
    put(&mut world, "b", 0, 1, 0);
    assert_eq!(seen.borrow().len(), 3);
}

#[test]
fn snapshot_supports_undo() {
    let mut world = World::new("test");
    let a = put(&mut world, "a", 0, 0, 0);
    let b = put(&mut world, "b", 0, 1, 0);
    assert!(world
        .connect_path(a, Path::new(a, Direction::East, b, Direction::West))
        .unwrap()
        .is_connected());

    let before = world.snapshot();
    world.remove_place(b).unwrap();
    assert!(world.place(a).unwrap().is_unconnected());

    let world = before;
    assert_eq!(world.paths_between(a, b).len(), 1);
    assert_eq!(world.place(b).unwrap().placement().map(|p| p.x), Some(1));
    world.validate().unwrap();
}

// =============================================================================
// Properties
// =============================================================================

#[derive(Clone, Debug)]
enum Op {
    Put(i32, i32),
    Remove(usize),
    Connect(usize, usize, u8),
    Child(usize, usize),
    Unchild(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i32..4, 0i32..4).prop_map(|(x, y)| Op::Put(x, y)),
        (0usize..16).prop_map(Op::Remove),
        (0usize..16, 0usize..16, 0u8..4).prop_map(|(a, b, d)| Op::Connect(a, b, d)),
        (0usize..16, 0usize..16).prop_map(|(a, b)| Op::Child(a, b)),
        (0usize..16, 0usize..16).prop_map(|(a, b)| Op::Unchild(a, b)),
    ]
}

proptest! {
    #[test]
    fn random_edits_keep_the_world_consistent(ops in proptest::collection::vec(op(), 0..80)) {
        let mut world = World::new("prop");
        let mut ids: Vec<PlaceId> = Vec::new();
        let dirs = Direction::COMPASS;

        for op in ops {
            match op {
                Op::Put(x, y) => {
                    let place = world.new_place("p");
                    if let Ok(id) = world.put_place(place, LayerId(0), x, y) {
                        ids.push(id);
                    }
                }
                Op::Remove(i) if !ids.is_empty() => {
                    let id = ids.remove(i % ids.len());
                    world.remove_place(id).unwrap();
                    for place in world.places() {
                        prop_assert!(!place.has_child(id));
                        prop_assert!(!place.has_parent(id));
                        prop_assert!(world.paths_of(place.id()).all(|(_, p)| !p.has_place(id)));
                    }
                }
                Op::Connect(a, b, d) if !ids.is_empty() => {
                    let (a, b) = (ids[a % ids.len()], ids[b % ids.len()]);
                    let dir = dirs[usize::from(d)].clone();
                    let back = dirs[usize::from(d) + 4].clone();
                    let _ = world.connect_path(a, Path::new(a, dir, b, back));
                }
                Op::Child(a, b) if !ids.is_empty() => {
                    let (a, b) = (ids[a % ids.len()], ids[b % ids.len()]);
                    world.connect_child(a, b).unwrap();
                }
                Op::Unchild(a, b) if !ids.is_empty() => {
                    let (a, b) = (ids[a % ids.len()], ids[b % ids.len()]);
                    world.remove_child(a, b);
                }
                _ => {}
            }

            for place in world.places() {
                for child in place.children() {
                    prop_assert!(world.place(child).unwrap().has_parent(place.id()));
                }
                for parent in place.parents() {
                    prop_assert!(world.place(parent).unwrap().has_child(place.id()));
                }
            }
        }
        prop_assert!(world.validate().is_ok());
    }
}
