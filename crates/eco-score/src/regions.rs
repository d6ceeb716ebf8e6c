//! Static geographic lookup tables.
//!
//! Every rule in the pipeline that depends on "where" a location is goes
//! through this module: urban/suburban pressure, vegetated regions,
//! coastal proximity, protected areas and the regional decline factors.
//! Tables are ordered; lookups that return a single match take the first.

use eco_common::{BoundingBox, Location};

/// A labelled bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedRegion {
    pub name: &'static str,
    pub bbox: BoundingBox,
}

const fn region(
    name: &'static str,
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
) -> NamedRegion {
    NamedRegion {
        name,
        bbox: BoundingBox::new(min_lon, min_lat, max_lon, max_lat),
    }
}

impl NamedRegion {
    pub fn contains(&self, location: &Location) -> bool {
        self.bbox.contains_location(location)
    }
}

/// Dense urban cores of major US metros.
pub const URBAN_AREAS: &[NamedRegion] = &[
    region("New York", 40.50, 40.95, -74.30, -73.70),
    region("Los Angeles", 33.70, 34.35, -118.70, -118.00),
    region("Chicago", 41.60, 42.10, -87.95, -87.50),
    region("Houston", 29.50, 30.10, -95.80, -95.00),
    region("San Francisco", 37.60, 37.85, -122.55, -122.35),
];

/// Suburban rings around the same metros. Urban cores sit inside these,
/// so callers check urban first.
pub const SUBURBAN_AREAS: &[NamedRegion] = &[
    region("Greater New York", 40.30, 41.30, -74.80, -73.20),
    region("Greater Los Angeles", 33.40, 34.60, -119.00, -117.20),
    region("Chicagoland", 41.40, 42.40, -88.40, -87.50),
    region("Greater Houston", 29.20, 30.40, -96.10, -94.80),
    region("Bay Area", 37.20, 38.20, -122.60, -121.70),
];

/// Regions with dense natural vegetation cover.
pub const VEGETATED_REGIONS: &[NamedRegion] = &[
    region("Pacific Northwest", 42.0, 49.0, -125.0, -116.0),
    region("Southeast", 30.0, 36.5, -91.0, -75.0),
];

/// Protected lands where the projected trend is treated as stable.
pub const PROTECTED_AREAS: &[NamedRegion] = &[
    region("Yellowstone", 44.10, 45.10, -111.15, -109.80),
    region("Yosemite", 37.45, 38.20, -119.90, -119.20),
    region("Great Smoky Mountains", 35.40, 35.80, -84.00, -83.00),
    region("Everglades", 25.10, 25.90, -81.30, -80.30),
    region("Grand Canyon", 35.80, 36.50, -113.50, -111.50),
];

/// The Gulf of Mexico shoreline.
pub const GULF_COAST: NamedRegion = region("Gulf Coast", 25.0, 31.0, -98.0, -81.0);

/// A coastline approximated by a reference meridian over a latitude span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoastalMeridian {
    pub name: &'static str,
    pub longitude: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

/// Longitude half-width of the coastal band around each reference meridian.
pub const COASTAL_HALF_WIDTH_DEG: f64 = 5.0;

pub const COASTAL_MERIDIANS: &[CoastalMeridian] = &[
    CoastalMeridian {
        name: "Atlantic",
        longitude: -75.0,
        min_lat: 25.0,
        max_lat: 45.0,
    },
    CoastalMeridian {
        name: "Southern California Pacific",
        longitude: -118.0,
        min_lat: 32.0,
        max_lat: 35.5,
    },
];

/// Annual decline contributed by a region, in score points per year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionalFactor {
    pub region: NamedRegion,
    pub factor: f64,
}

pub const REGIONAL_FACTORS: &[RegionalFactor] = &[
    RegionalFactor {
        region: region("Southern California", 32.5, 35.0, -121.0, -114.0),
        factor: -0.8,
    },
    RegionalFactor {
        region: region("NYC Metro", 40.3, 41.2, -74.5, -73.3),
        factor: -0.7,
    },
    RegionalFactor {
        region: GULF_COAST,
        factor: -0.6,
    },
    RegionalFactor {
        region: region("Pacific Northwest", 42.0, 49.0, -125.0, -116.0),
        factor: -0.2,
    },
];

pub const DEFAULT_REGIONAL_FACTOR: f64 = -0.5;

fn first_match(table: &'static [NamedRegion], location: &Location) -> Option<&'static NamedRegion> {
    table.iter().find(|r| r.contains(location))
}

/// The urban core containing `location`, if any.
pub fn urban_area(location: &Location) -> Option<&'static NamedRegion> {
    first_match(URBAN_AREAS, location)
}

pub fn is_urban(location: &Location) -> bool {
    urban_area(location).is_some()
}

pub fn is_suburban(location: &Location) -> bool {
    first_match(SUBURBAN_AREAS, location).is_some()
}

pub fn is_vegetated(location: &Location) -> bool {
    first_match(VEGETATED_REGIONS, location).is_some()
}

pub fn is_protected(location: &Location) -> bool {
    first_match(PROTECTED_AREAS, location).is_some()
}

pub fn is_coastal(location: &Location) -> bool {
    let near_meridian = COASTAL_MERIDIANS.iter().any(|m| {
        (location.lon - m.longitude).abs() <= COASTAL_HALF_WIDTH_DEG
            && location.lat >= m.min_lat
            && location.lat <= m.max_lat
    });
    near_meridian || GULF_COAST.contains(location)
}

/// Regional decline factor and the name of the region it came from.
pub fn regional_factor(location: &Location) -> (&'static str, f64) {
    REGIONAL_FACTORS
        .iter()
        .find(|f| f.region.contains(location))
        .map(|f| (f.region.name, f.factor))
        .unwrap_or(("Default", DEFAULT_REGIONAL_FACTOR))
}

/// The three independent land-cover predicates, evaluated once per location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LandCover {
    pub urban: bool,
    pub vegetated: bool,
    pub coastal: bool,
}

impl LandCover {
    pub fn classify(location: &Location) -> Self {
        Self {
            urban: is_urban(location),
            vegetated: is_vegetated(location),
            coastal: is_coastal(location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lat: f64, lon: f64) -> Location {
        Location { lat, lon }
    }

    #[test]
    fn test_sonoma_is_rural_inland() {
        let sonoma = loc(38.5, -122.9);
        assert_eq!(LandCover::classify(&sonoma), LandCover::default());
        assert!(!is_suburban(&sonoma));
        assert!(!is_protected(&sonoma));
        assert_eq!(regional_factor(&sonoma), ("Default", DEFAULT_REGIONAL_FACTOR));
    }

    #[test]
    fn test_urban_cores() {
        assert_eq!(urban_area(&loc(40.75, -73.98)).map(|r| r.name), Some("New York"));
        assert_eq!(urban_area(&loc(34.05, -118.25)).map(|r| r.name), Some("Los Angeles"));
        assert!(is_urban(&loc(41.88, -87.63)));
        assert!(!is_urban(&loc(44.0, -100.0)));
    }

    #[test]
    fn test_urban_cores_sit_inside_suburban_rings() {
        for area in URBAN_AREAS {
            assert!(is_suburban(&area.bbox.center()), "{} not suburban", area.name);
        }
    }

    #[test]
    fn test_coastal_bands() {
        // Atlantic band
        assert!(is_coastal(&loc(39.0, -76.5)));
        // Southern California band
        assert!(is_coastal(&loc(34.0, -118.3)));
        // Gulf box
        assert!(is_coastal(&loc(29.9, -90.1)));
        // Denver
        assert!(!is_coastal(&loc(39.7, -105.0)));
        // Latitude outside Atlantic span
        assert!(!is_coastal(&loc(50.0, -75.0)));
    }

    #[test]
    fn test_regional_factor_first_match_wins() {
        // Los Angeles: Southern California is listed first
        assert_eq!(regional_factor(&loc(34.05, -118.25)), ("Southern California", -0.8));
        assert_eq!(regional_factor(&loc(40.75, -73.98)), ("NYC Metro", -0.7));
        assert_eq!(regional_factor(&loc(47.6, -122.3)), ("Pacific Northwest", -0.2));
        assert_eq!(regional_factor(&loc(29.9, -90.1)), ("Gulf Coast", -0.6));
    }

    #[test]
    fn test_protected_areas() {
        assert!(is_protected(&loc(44.6, -110.5)));
        assert!(is_protected(&loc(37.8, -119.5)));
        assert!(!is_protected(&loc(37.8, -122.4)));
    }
}
