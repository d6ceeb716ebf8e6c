//! Band samples and the synthetic band generator.
//!
//! Sensor products store surface reflectance as 16-bit integers scaled by
//! 10000. [`BandSample`] carries values on that scale; [`Reflectance`] is
//! the same five bands as 0-1 fractions, which is what the index formulas
//! with additive constants (EVI, SAVI) expect.

use eco_common::Location;
use serde::{Deserialize, Serialize};

use crate::regions::LandCover;
use crate::rng::JitterRng;

/// Scale between stored digital numbers and reflectance fractions.
pub const REFLECTANCE_SCALE: f64 = 10_000.0;

/// One pixel's five bands as scaled digital numbers (0-10000).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSample {
    pub blue: f64,
    pub green: f64,
    pub red: f64,
    pub nir: f64,
    pub swir: f64,
}

impl BandSample {
    /// Convert to reflectance fractions.
    pub fn decode(&self) -> Reflectance {
        Reflectance {
            blue: self.blue / REFLECTANCE_SCALE,
            green: self.green / REFLECTANCE_SCALE,
            red: self.red / REFLECTANCE_SCALE,
            nir: self.nir / REFLECTANCE_SCALE,
            swir: self.swir / REFLECTANCE_SCALE,
        }
    }

    /// All bands finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.blue, self.green, self.red, self.nir, self.swir]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Five bands as reflectance fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reflectance {
    pub blue: f64,
    pub green: f64,
    pub red: f64,
    pub nir: f64,
    pub swir: f64,
}

impl Reflectance {
    /// Clamp to `[0, 1]` and round to integer digital numbers.
    pub fn encode(&self) -> BandSample {
        let dn = |v: f64| (v.clamp(0.0, 1.0) * REFLECTANCE_SCALE).round();
        BandSample {
            blue: dn(self.blue),
            green: dn(self.green),
            red: dn(self.red),
            nir: dn(self.nir),
            swir: dn(self.swir),
        }
    }
}

/// Uniform draw range for one band, as reflectance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRange {
    pub low: f64,
    pub high: f64,
}

pub const BLUE_RANGE: BandRange = BandRange { low: 0.08, high: 0.12 };
pub const GREEN_RANGE: BandRange = BandRange { low: 0.10, high: 0.15 };
pub const RED_RANGE: BandRange = BandRange { low: 0.15, high: 0.25 };
pub const NIR_RANGE: BandRange = BandRange { low: 0.25, high: 0.40 };
pub const SWIR_RANGE: BandRange = BandRange { low: 0.15, high: 0.25 };

fn draw(rng: &mut JitterRng, range: BandRange) -> f64 {
    rng.uniform(range.low, range.high)
}

/// Produce a synthetic band sample for `location`.
///
/// Draw order is blue, green, red, nir, swir; land-cover adjustments then
/// apply in the order urban, vegetated, coastal.
pub fn synthesize(location: &Location, rng: &mut JitterRng) -> BandSample {
    let mut reflectance = Reflectance {
        blue: draw(rng, BLUE_RANGE),
        green: draw(rng, GREEN_RANGE),
        red: draw(rng, RED_RANGE),
        nir: draw(rng, NIR_RANGE),
        swir: draw(rng, SWIR_RANGE),
    };
    apply_land_cover(&mut reflectance, LandCover::classify(location));
    reflectance.encode()
}

/// Multiplicative land-cover adjustments.
pub fn apply_land_cover(reflectance: &mut Reflectance, cover: LandCover) {
    if cover.urban {
        reflectance.nir *= 0.7;
        reflectance.red *= 1.2;
    }
    if cover.vegetated {
        reflectance.nir *= 1.3;
        reflectance.green *= 1.2;
    }
    if cover.coastal {
        reflectance.green *= 1.1;
        reflectance.nir *= 0.8;
    }
}
