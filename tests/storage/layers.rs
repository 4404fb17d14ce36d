//! Integration tests for the layer cell index
//!
//! Tests cell exclusivity, removal checks, neighborhoods, and extents.

use mudgrid_foundation::{ErrorKind, LayerId, PlaceId};
use mudgrid_storage::{BoundingBox, Layer, LayerElement, Place, Placement};
use proptest::prelude::*;

fn placed(id: u32, layer: i32, x: i32, y: i32) -> Place {
    let mut place = Place::new(PlaceId(id), format!("room {id}"));
    place.set_placement(Some(Placement::new(LayerId(layer), x, y)));
    place
}

// =============================================================================
// Cell Exclusivity
// =============================================================================

#[test]
fn occupied_cell_rejects_second_place() {
    let mut layer = Layer::new(LayerId(0));
    layer.put(PlaceId(1), 0, 0).unwrap();

    let err = layer.put(PlaceId(2), 0, 0).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::PositionOccupied { occupant, .. } if occupant == PlaceId(1)
    ));
    assert!(layer.exists(0, 0));
    assert_eq!(layer.get(0, 0), Some(PlaceId(1)));
    assert_eq!(layer.len(), 1);
}

#[test]
fn putting_same_place_twice_is_harmless() {
    let mut layer = Layer::new(LayerId(0));
    layer.put(PlaceId(1), 4, 4).unwrap();
    layer.put(PlaceId(1), 4, 4).unwrap();
    assert_eq!(layer.len(), 1);
}

#[test]
fn try_get_reports_empty_cells() {
    let layer = Layer::new(LayerId(3));
    let err = layer.try_get(1, 2).unwrap_err();
    assert!(err.is_not_found());
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn remove_checks_layer() {
    let mut layer = Layer::new(LayerId(0));
    layer.put(PlaceId(1), 0, 0).unwrap();

    let err = layer.remove(&placed(1, 5, 0, 0)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LayerMismatch { .. }));
    assert!(layer.exists(0, 0));
}

#[test]
fn remove_checks_cell() {
    let mut layer = Layer::new(LayerId(0));
    layer.put(PlaceId(1), 0, 0).unwrap();
    layer.put(PlaceId(2), 1, 0).unwrap();

    let err = layer.remove(&placed(2, 0, 0, 0)).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::PositionMismatch { found: Some(found), .. } if found == PlaceId(1)
    ));
    assert_eq!(layer.len(), 2);
}

#[test]
fn remove_vacates_cell() {
    let mut layer = Layer::new(LayerId(0));
    layer.put(PlaceId(1), 2, 3).unwrap();
    layer.remove(&placed(1, 0, 2, 3)).unwrap();
    assert!(!layer.exists(2, 3));
    assert!(layer.is_empty());
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn neighbors_exclude_center() {
    let mut layer = Layer::new(LayerId(0));
    let mut next = 1;
    for x in -2..=2 {
        for y in -2..=2 {
            layer.put(PlaceId(next), x, y).unwrap();
            next += 1;
        }
    }

    assert_eq!(layer.neighbors(0, 0, 1).len(), 8);
    assert_eq!(layer.neighbors(0, 0, 2).len(), 24);
    assert!(layer.neighbors(0, 0, 1).iter().all(|&(x, y, _)| (x, y) != (0, 0)));
    assert_eq!(layer.neighbors(2, 2, 1).len(), 3);
}

#[test]
fn bounding_box_covers_cells() {
    let mut layer = Layer::new(LayerId(0));
    assert_eq!(layer.bounding_box(), BoundingBox::default());

    layer.put(PlaceId(1), -3, 2).unwrap();
    layer.put(PlaceId(2), 4, -1).unwrap();
    let bounds = layer.bounding_box();
    assert_eq!((bounds.x_min, bounds.x_max), (-3, 4));
    assert_eq!((bounds.y_min, bounds.y_max), (-1, 2));
    assert!(bounds.contains(0, 0));
    assert!(!bounds.contains(5, 0));
}

#[test]
fn iteration_is_ordered() {
    let mut layer = Layer::new(LayerId(0));
    layer.put(PlaceId(1), 5, 0).unwrap();
    layer.put(PlaceId(2), -5, 1).unwrap();
    layer.put(PlaceId(3), -5, 0).unwrap();

    let cells: Vec<_> = layer.iter().map(|(x, y, _)| (x, y)).collect();
    assert_eq!(cells, vec![(-5, 0), (-5, 1), (5, 0)]);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn at_most_one_place_per_cell(ops in proptest::collection::vec((1u32..20, -4i32..4, -4i32..4), 0..60)) {
        let mut layer = Layer::new(LayerId(0));
        let mut cells = std::collections::HashMap::new();
        for (id, x, y) in ops {
            let before = layer.get(x, y);
            match layer.put(PlaceId(id), x, y) {
                Ok(()) => {
                    prop_assert!(before.is_none() || before == Some(PlaceId(id)));
                    cells.insert((x, y), PlaceId(id));
                }
                Err(_) => prop_assert_eq!(layer.get(x, y), before),
            }
        }
        prop_assert_eq!(layer.len(), cells.len());
        for ((x, y), id) in cells {
            prop_assert_eq!(layer.get(x, y), Some(id));
        }
    }
}
