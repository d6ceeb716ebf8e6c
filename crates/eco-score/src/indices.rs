//! Normalized spectral indices.
//!
//! Each function takes reflectance fractions and returns a value clamped to
//! `[-1, 1]`. A zero denominator yields 0 rather than NaN or infinity.

use serde::{Deserialize, Serialize};

use crate::bands::{BandSample, Reflectance};

/// Default soil brightness correction for SAVI.
pub const DEFAULT_SAVI_L: f64 = 0.5;

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        (numerator / denominator).clamp(-1.0, 1.0)
    }
}

/// Normalized Difference Vegetation Index.
pub fn ndvi(red: f64, nir: f64) -> f64 {
    ratio(nir - red, nir + red)
}

/// Normalized Difference Water Index (McFeeters).
pub fn ndwi(green: f64, nir: f64) -> f64 {
    ratio(green - nir, green + nir)
}

/// Modified NDWI, using shortwave infrared instead of near infrared.
pub fn mndwi(green: f64, swir: f64) -> f64 {
    ratio(green - swir, green + swir)
}

/// Enhanced Vegetation Index.
pub fn evi(blue: f64, red: f64, nir: f64) -> f64 {
    ratio(2.5 * (nir - red), nir + 6.0 * red - 7.5 * blue + 1.0)
}

/// Soil-Adjusted Vegetation Index with brightness correction `l`.
pub fn savi(red: f64, nir: f64, l: f64) -> f64 {
    let denominator = nir + red + l;
    if denominator == 0.0 {
        return 0.0;
    }
    ((nir - red) / denominator * (1.0 + l)).clamp(-1.0, 1.0)
}

/// All five indices for one sample. Immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralIndices {
    pub ndvi: f64,
    pub ndwi: f64,
    pub mndwi: f64,
    pub evi: f64,
    pub savi: f64,
}

impl SpectralIndices {
    pub fn from_reflectance(r: &Reflectance, savi_l: f64) -> Self {
        Self {
            ndvi: ndvi(r.red, r.nir),
            ndwi: ndwi(r.green, r.nir),
            mndwi: mndwi(r.green, r.swir),
            evi: evi(r.blue, r.red, r.nir),
            savi: savi(r.red, r.nir, savi_l),
        }
    }

    pub fn from_bands(bands: &BandSample, savi_l: f64) -> Self {
        Self::from_reflectance(&bands.decode(), savi_l)
    }
}
