//! WGS84 point locations.

use serde::{Deserialize, Serialize};

use crate::error::{EcoError, EcoResult};

/// A point on the globe in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    /// Create a validated location.
    ///
    /// Fails with [`EcoError::InvalidCoordinates`] for non-finite values,
    /// latitudes outside `[-90, 90]` or longitudes outside `[-180, 180]`.
    pub fn new(lat: f64, lon: f64) -> EcoResult<Self> {
        let location = Self { lat, lon };
        location.validate()?;
        Ok(location)
    }

    /// Re-check a location that may have been built from a struct literal or deserialized.
    pub fn validate(&self) -> EcoResult<()> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(EcoError::invalid_coordinates(
                self.lat,
                self.lon,
                "coordinates must be finite",
            ));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(EcoError::invalid_coordinates(
                self.lat,
                self.lon,
                "latitude must be within [-90, 90]",
            ));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(EcoError::invalid_coordinates(
                self.lat,
                self.lon,
                "longitude must be within [-180, 180]",
            ));
        }
        Ok(())
    }

    /// Coordinates rounded to `decimals` places and scaled to integers, for hashing.
    pub fn quantize(&self, decimals: u32) -> (i64, i64) {
        let factor = 10_f64.powi(decimals as i32);
        (
            (self.lat * factor).round() as i64,
            (self.lon * factor).round() as i64,
        )
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}
