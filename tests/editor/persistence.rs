//! Integration tests for world persistence
//!
//! Tests record capture, restore, and MessagePack save files.

use mudgrid_editor::{WorldRecord, from_bytes, load_from_file, save_to_file, to_bytes};
use mudgrid_foundation::{AreaId, Color, Coordinate, Direction, ErrorKind, LayerId, RiskLevelId};
use mudgrid_storage::{Area, Path, ShowPlaceId, World, WorldConfig};

fn town() -> World {
    let mut world = World::new("Town");
    world.set_home(Coordinate::at_tile(LayerId(0), 1, 1));
    world.set_config(
        WorldConfig::default()
            .with_show_place_id(ShowPlaceId::All)
            .with_path_color(Direction::parse("portal").unwrap(), Color::RED),
    );
    let market = world.add_area(Area::new(AreaId(0), "Market", Color::YELLOW)).unwrap();
    world.new_layer(Some("street")).unwrap();
    world.new_layer(Some("sewers")).unwrap();

    let square = world.new_place("Square");
    let square = world.put_place(square, LayerId(0), 0, 0).unwrap();
    let stall = world.new_place("Stall");
    let stall = world.put_place(stall, LayerId(0), 1, 0).unwrap();
    let drain = world.new_place("Drain");
    let drain = world.put_place(drain, LayerId(1), 0, 0).unwrap();
    world.put_placeholder(LayerId(0), 0, 1).unwrap();

    world
        .modify_place(stall, |p| {
            p.set_area(Some(market));
            p.set_risk_level(Some(RiskLevelId(1)));
            p.set_flag("shop", true);
        })
        .unwrap();
    assert!(world
        .connect_path(square, Path::new(square, Direction::East, stall, Direction::West))
        .unwrap()
        .is_connected());
    assert!(world
        .connect_path(square, Path::new(square, Direction::Down, drain, Direction::Up))
        .unwrap()
        .is_connected());
    assert!(world
        .connect_path(drain, Path::new(drain, Direction::parse("portal").unwrap(), drain, Direction::Unknown))
        .unwrap()
        .is_connected());
    world.connect_child(square, stall).unwrap();
    world
}

#[test]
fn record_roundtrip_preserves_world() {
    let world = town();
    let record = WorldRecord::capture(&world);
    let restored = record.restore().unwrap();

    restored.validate().unwrap();
    assert_eq!(WorldRecord::capture(&restored), record);
    assert_eq!(restored.place_count(), 4);
    assert_eq!(restored.paths().count(), 3);
    assert_eq!(restored.config().show_place_id, ShowPlaceId::All);
}

#[test]
fn messagepack_roundtrip() {
    let world = town();
    let bytes = to_bytes(&world).unwrap();
    let restored = from_bytes(&bytes).unwrap();

    assert_eq!(WorldRecord::capture(&restored), WorldRecord::capture(&world));
    assert!(restored.place(restored.search_places(&["stall"])[0]).unwrap().flag("shop"));
}

#[test]
fn records_decode_with_rmp_serde() {
    let record = WorldRecord::capture(&town());
    let bytes = rmp_serde::to_vec_named(&record).unwrap();
    let decoded: WorldRecord = rmp_serde::from_slice(&bytes).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn file_roundtrip() {
    let world = town();
    let temp_path = std::env::temp_dir().join("mudgrid_integration_town.msgpack");

    save_to_file(&world, &temp_path).unwrap();
    let restored = load_from_file(&temp_path).unwrap();
    assert_eq!(restored.name(), "Town");
    assert_eq!(restored.home().tile(), (1, 1));

    let _ = std::fs::remove_file(&temp_path);
}

#[test]
fn inconsistent_records_are_rejected() {
    let mut record = WorldRecord::capture(&town());
    let first = record.places[0].clone();
    let mut clash = record.places[1].clone();
    clash.layer = first.layer;
    clash.x = first.x;
    clash.y = first.y;
    record.places[1] = clash;

    let err = record.restore().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PositionOccupied { .. }));
    assert_eq!(err.context.unwrap().index, Some(1));
}
