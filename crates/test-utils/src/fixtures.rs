//! Common test fixtures for eco-score tests.
//!
//! Locations are `(lat, lon)`; bounding boxes are
//! `(min_lon, min_lat, max_lon, max_lat)`.

/// Reference locations with known land-cover classification.
pub mod locations {
    /// Sonoma County: rural, not coastal, not vegetated, default region.
    pub const SONOMA: (f64, f64) = (38.5, -122.9);

    /// Downtown Los Angeles: urban core inside Southern California.
    pub const LOS_ANGELES: (f64, f64) = (34.05, -118.25);

    /// Seattle: Pacific Northwest, vegetated.
    pub const SEATTLE: (f64, f64) = (47.6, -122.3);

    /// Yellowstone: protected area.
    pub const YELLOWSTONE: (f64, f64) = (44.6, -110.5);

    /// Manhattan: urban core, Atlantic coastal band, NYC metro.
    pub const MANHATTAN: (f64, f64) = (40.75, -73.98);

    /// New Orleans: Gulf Coast.
    pub const NEW_ORLEANS: (f64, f64) = (29.95, -90.07);

    /// Out of range latitude.
    pub const INVALID_LAT: (f64, f64) = (91.0, 0.0);

    /// Out of range longitude.
    pub const INVALID_LON: (f64, f64) = (0.0, 181.0);
}

/// Common bounding box definitions for testing.
pub mod bbox {
    /// Continental United States bounding box
    pub const CONUS: (f64, f64, f64, f64) = (-125.0, 24.0, -66.0, 50.0);

    /// Rural Sonoma County, clear of every urban, coastal and protected box
    pub const SONOMA_COUNTY: (f64, f64, f64, f64) = (-123.0, 38.3, -122.8, 38.7);

    /// Inside the Los Angeles urban core
    pub const LOS_ANGELES_CORE: (f64, f64, f64, f64) = (-118.5, 33.9, -118.1, 34.2);

    /// Invalid bbox (min > max)
    pub const INVALID: (f64, f64, f64, f64) = (10.0, 10.0, 5.0, 5.0);
}

/// Seeds used across the suite.
pub mod seeds {
    pub const DEFAULT: u64 = 42;
    pub const ALTERNATE: u64 = 7;
}

/// Band digital numbers on the 0-10000 scale, ordered blue, green, red, nir, swir.
pub mod bands {
    /// Middle of every synthesizer range.
    pub const MIDRANGE: [f64; 5] = [1000.0, 1250.0, 2000.0, 3250.0, 2000.0];

    /// Dense vegetation: strong nir, weak red.
    pub const VEGETATION: [f64; 5] = [500.0, 900.0, 400.0, 5000.0, 1500.0];

    /// Open water: green above nir.
    pub const WATER: [f64; 5] = [900.0, 1400.0, 700.0, 300.0, 200.0];
}

/// Eco scores for a ten-tract batch: 10, 20, ... 100.
pub fn score_ladder() -> Vec<f64> {
    (1..=10).map(|i| i as f64 * 10.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_ladder() {
        let scores = score_ladder();
        assert_eq!(scores.len(), 10);
        assert_eq!(scores[0], 10.0);
        assert_eq!(scores[9], 100.0);
    }

    #[test]
    fn test_bboxes_are_ordered() {
        for (min_lon, min_lat, max_lon, max_lat) in
            [bbox::CONUS, bbox::SONOMA_COUNTY, bbox::LOS_ANGELES_CORE]
        {
            assert!(min_lon < max_lon);
            assert!(min_lat < max_lat);
        }
    }
}
