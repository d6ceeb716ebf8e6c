//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::error::{EcoError, EcoResult};
use crate::location::Location;

/// A geographic bounding box in WGS84 degrees.
///
/// Containment checks are inclusive on every edge, so a point sitting on
/// the boundary of two adjacent boxes matches both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Parse a "minlon,minlat,maxlon,maxlat" string.
    pub fn parse(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0_f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))?;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    /// Check that the box is finite, ordered and inside WGS84 limits.
    pub fn validate(&self) -> EcoResult<()> {
        let corners = [self.min_lon, self.min_lat, self.max_lon, self.max_lat];
        if corners.iter().any(|v| !v.is_finite()) {
            return Err(EcoError::invalid_parameter(
                "bbox",
                format!("non-finite corner in {:?}", corners),
            ));
        }

        Location::new(self.min_lat, self.min_lon)?;
        Location::new(self.max_lat, self.max_lon)?;

        if self.min_lon >= self.max_lon || self.min_lat >= self.max_lat {
            return Err(EcoError::invalid_parameter(
                "bbox",
                format!(
                    "min corner ({}, {}) must be below max corner ({}, {})",
                    self.min_lon, self.min_lat, self.max_lon, self.max_lat
                ),
            ));
        }

        Ok(())
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.max_lon < other.min_lon
            || self.min_lon > other.max_lon
            || self.max_lat < other.min_lat
            || self.min_lat > other.max_lat)
    }

    /// Check if a lat/lon pair falls inside this bbox.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Check if a location falls inside this bbox.
    pub fn contains_location(&self, location: &Location) -> bool {
        self.contains(location.lat, location.lon)
    }

    /// Center point of the box.
    pub fn center(&self) -> Location {
        Location {
            lat: (self.min_lat + self.max_lat) / 2.0,
            lon: (self.min_lon + self.max_lon) / 2.0,
        }
    }

    /// Closed polygon ring (lon, lat) in counter-clockwise order, as GeoJSON expects.
    pub fn ring(&self) -> Vec<[f64; 2]> {
        vec![
            [self.min_lon, self.min_lat],
            [self.max_lon, self.min_lat],
            [self.max_lon, self.max_lat],
            [self.min_lon, self.max_lat],
            [self.min_lon, self.min_lat],
        ]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bbox format: {0}. Expected 'minlon,minlat,maxlon,maxlat'")]
    InvalidFormat(String),

    #[error("Invalid number in bbox: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox() {
        let bbox = BoundingBox::parse("-123.5, 38.0,-122.0,39.0").unwrap();
        assert_eq!(bbox.min_lon, -123.5);
        assert_eq!(bbox.min_lat, 38.0);
        assert_eq!(bbox.max_lon, -122.0);
        assert_eq!(bbox.max_lat, 39.0);
    }

    #[test]
    fn test_parse_bbox_errors() {
        assert!(matches!(
            BoundingBox::parse("1,2,3"),
            Err(BboxParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            BoundingBox::parse("1,2,x,4"),
            Err(BboxParseError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = BoundingBox::new(-100.0, 30.0, -90.0, 40.0);
        assert!(bbox.contains(35.0, -95.0));
        assert!(bbox.contains(30.0, -100.0));
        assert!(bbox.contains(40.0, -90.0));
        assert!(!bbox.contains(45.0, -95.0));
        assert!(!bbox.contains(35.0, -105.0));
    }

    #[test]
    fn test_validate() {
        assert!(BoundingBox::new(-10.0, -10.0, 10.0, 10.0).validate().is_ok());
        assert!(BoundingBox::new(10.0, -10.0, -10.0, 10.0).validate().is_err());
        assert!(BoundingBox::new(-190.0, -10.0, 10.0, 10.0).validate().is_err());
        assert!(BoundingBox::new(f64::NAN, -10.0, 10.0, 10.0).validate().is_err());
    }

    #[test]
    fn test_ring_is_closed() {
        let ring = BoundingBox::new(0.0, 0.0, 1.0, 2.0).ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }
}
