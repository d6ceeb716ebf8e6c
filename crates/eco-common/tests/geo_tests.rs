//! Tests for Location and BoundingBox working together.

use eco_common::bbox::{BboxParseError, BoundingBox};
use eco_common::{EcoError, Location};

// ============================================================================
// Parsing tests
// ============================================================================

#[test]
fn test_parse_bbox_scientific_notation() {
    let bbox = BoundingBox::parse("-1e2,2e1,-9e1,3e1").unwrap();
    assert_eq!(bbox.min_lon, -100.0);
    assert_eq!(bbox.min_lat, 20.0);
    assert_eq!(bbox.max_lon, -90.0);
    assert_eq!(bbox.max_lat, 30.0);
}

#[test]
fn test_parse_bbox_empty_string() {
    assert!(matches!(
        BoundingBox::parse(""),
        Err(BboxParseError::InvalidFormat(_))
    ));
}

#[test]
fn test_parse_bbox_too_many_parts() {
    assert!(matches!(
        BoundingBox::parse("1,2,3,4,5"),
        Err(BboxParseError::InvalidFormat(_))
    ));
}

// ============================================================================
// Containment tests
// ============================================================================

#[test]
fn test_center_is_contained() {
    let bbox = BoundingBox::new(-123.0, 38.0, -122.0, 39.0);
    let center = bbox.center();
    assert_eq!(center, Location { lat: 38.5, lon: -122.5 });
    assert!(bbox.contains_location(&center));
}

#[test]
fn test_adjacent_boxes_share_edge() {
    let west = BoundingBox::new(-10.0, 0.0, 0.0, 10.0);
    let east = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let on_edge = Location::new(5.0, 0.0).unwrap();
    assert!(west.contains_location(&on_edge));
    assert!(east.contains_location(&on_edge));
    assert!(west.intersects(&east));
}

#[test]
fn test_disjoint_boxes() {
    let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
    let b = BoundingBox::new(2.0, 2.0, 3.0, 3.0);
    assert!(!a.intersects(&b));
    assert!(!b.intersects(&a));
}

// ============================================================================
// Validation tests
// ============================================================================

#[test]
fn test_validate_rejects_out_of_range_latitude() {
    let err = BoundingBox::new(0.0, -95.0, 10.0, 10.0).validate().unwrap_err();
    assert!(matches!(err, EcoError::InvalidCoordinates { .. }));
}

#[test]
fn test_validate_rejects_degenerate_box() {
    let err = BoundingBox::new(0.0, 0.0, 0.0, 10.0).validate().unwrap_err();
    assert!(matches!(err, EcoError::InvalidParameter { .. }));
}

#[test]
fn test_error_messages_include_coordinates() {
    let err = Location::new(123.0, 45.0).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("123"));
    assert!(message.contains("latitude"));
}
