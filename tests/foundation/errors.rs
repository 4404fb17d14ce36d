//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use mudgrid_foundation::{AreaId, Error, ErrorContext, ErrorKind, LayerId, PlaceId};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_place_not_found() {
    let err = Error::place_not_found(PlaceId(42));
    assert!(matches!(err.kind, ErrorKind::PlaceNotFound(_)));
    let msg = format!("{err}");
    assert!(msg.contains("42"));
}

#[test]
fn error_position_not_found() {
    let err = Error::position_not_found(LayerId(-1), 7, 8);
    assert!(matches!(err.kind, ErrorKind::PositionNotFound { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("7, 8"));
    assert!(msg.contains("layer -1"));
}

#[test]
fn error_invalid_argument() {
    let err = Error::invalid_argument("exit must not be empty");
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
    assert!(format!("{err}").contains("exit must not be empty"));
}

#[test]
fn error_ids_exhausted() {
    let err = Error::ids_exhausted("layer");
    assert!(matches!(err.kind, ErrorKind::IdsExhausted("layer")));
    assert_eq!(format!("{err}"), "no free layer id left");
    assert!(!err.is_not_found());
}

#[test]
fn not_found_kinds() {
    assert!(Error::area_not_found(AreaId(2)).is_not_found());
    assert!(Error::layer_not_found(LayerId(0)).is_not_found());
    assert!(!Error::new(ErrorKind::DuplicatePlaceId(PlaceId(1))).is_not_found());
    assert!(!Error::internal("boom").is_not_found());
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_display() {
    let ctx = ErrorContext::new()
        .with_source("place record")
        .with_index(12)
        .with_frame("loading world");
    let msg = format!("{ctx}");
    assert!(msg.starts_with("in place record #12"));
    assert!(msg.contains("in loading world"));
}

#[test]
fn context_survives_on_error() {
    let err = Error::place_not_found(PlaceId(3))
        .with_context(ErrorContext::new().with_source("child record"));
    assert_eq!(
        err.context.and_then(|c| c.source),
        Some("child record".to_string())
    );
}
