//! Conversion of spectral indices into 0-100 domain scores, plus the
//! direct location-based estimate used when no index pipeline is wanted.

use eco_common::{Color, Location, ScoreCategory};
use serde::{Deserialize, Serialize};

use crate::indices::SpectralIndices;
use crate::regions::LandCover;
use crate::rng::JitterRng;

/// Map NDVI to greenspace coverage percent.
///
/// Piecewise linear and continuous at 0.3 and 0.6; reaches 100 at NDVI 1.0.
pub fn ndvi_to_greenspace(ndvi: f64) -> f64 {
    if ndvi.is_nan() || ndvi < 0.0 {
        return 0.0;
    }
    let score = if ndvi < 0.3 {
        ndvi * 50.0
    } else if ndvi < 0.6 {
        15.0 + (ndvi - 0.3) * 100.0
    } else {
        45.0 + (ndvi - 0.6) * 137.5
    };
    score.clamp(0.0, 100.0)
}

/// Map NDWI to a water quality index.
pub fn ndwi_to_water_quality(ndwi: f64) -> f64 {
    if ndwi.is_nan() {
        return 0.0;
    }
    let ndwi = ndwi.clamp(-1.0, 1.0);
    let base = (ndwi + 1.0) * 50.0;
    if ndwi > 0.5 {
        (base + 20.0).min(100.0)
    } else if ndwi > 0.0 {
        base
    } else {
        (base - 20.0).max(0.0)
    }
}

/// A score in `[0, 100]` with its display category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainScore {
    pub value: f64,
    pub category: ScoreCategory,
}

impl DomainScore {
    /// Build a score, clamping `value` into range.
    pub fn new(value: f64) -> Self {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 100.0) };
        Self {
            value,
            category: ScoreCategory::from_score(value),
        }
    }

    pub fn color(&self) -> Color {
        self.category.color()
    }
}

/// Water quality and greenspace scores for one location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainScores {
    pub water_quality: DomainScore,
    pub greenspace: DomainScore,
}

impl DomainScores {
    pub fn from_indices(indices: &SpectralIndices) -> Self {
        Self {
            water_quality: DomainScore::new(ndwi_to_water_quality(indices.ndwi)),
            greenspace: DomainScore::new(ndvi_to_greenspace(indices.ndvi)),
        }
    }
}

/// How a location's domain scores are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Fetch bands, derive indices, convert indices to scores.
    #[default]
    SpectralIndex,
    /// Estimate scores straight from the location's land cover plus jitter.
    DirectEstimate,
}

impl ScoringStrategy {
    /// Parse from string (case-insensitive, `-` and `_` interchangeable).
    /// Unknown names fall back to the spectral index with a warning.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "direct_estimate" | "direct" | "estimate" => Self::DirectEstimate,
            "spectral_index" | "spectral" | "index" => Self::SpectralIndex,
            _ => {
                tracing::warn!(strategy = s, "unknown scoring strategy, using spectral_index");
                Self::SpectralIndex
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpectralIndex => "spectral_index",
            Self::DirectEstimate => "direct_estimate",
        }
    }
}

impl std::fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Direct estimate
// ============================================================================

pub const BASE_WATER_QUALITY: f64 = 60.0;
pub const BASE_GREENSPACE: f64 = 40.0;

/// Relative spread of the estimate jitter (plus or minus 10%).
pub const ESTIMATE_JITTER: f64 = 0.1;

/// Additive adjustment to both domains for one land-cover predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateAdjustment {
    pub water: f64,
    pub greenspace: f64,
}

pub const URBAN_ADJUSTMENT: EstimateAdjustment = EstimateAdjustment {
    water: -15.0,
    greenspace: -20.0,
};
pub const VEGETATED_ADJUSTMENT: EstimateAdjustment = EstimateAdjustment {
    water: 5.0,
    greenspace: 25.0,
};
pub const COASTAL_ADJUSTMENT: EstimateAdjustment = EstimateAdjustment {
    water: 10.0,
    greenspace: -5.0,
};

/// Land-cover adjusted (water, greenspace) before jitter.
pub fn estimate_base(cover: LandCover) -> (f64, f64) {
    let mut water = BASE_WATER_QUALITY;
    let mut green = BASE_GREENSPACE;
    for (applies, adj) in [
        (cover.urban, URBAN_ADJUSTMENT),
        (cover.vegetated, VEGETATED_ADJUSTMENT),
        (cover.coastal, COASTAL_ADJUSTMENT),
    ] {
        if applies {
            water += adj.water;
            green += adj.greenspace;
        }
    }
    (water, green)
}

/// Estimate both domain scores for `location` without any band data.
///
/// Water quality draws its jitter before greenspace.
pub fn estimate_scores(location: &Location, rng: &mut JitterRng) -> DomainScores {
    let (water, green) = estimate_base(LandCover::classify(location));
    DomainScores {
        water_quality: DomainScore::new(water * rng.factor(ESTIMATE_JITTER)),
        greenspace: DomainScore::new(green * rng.factor(ESTIMATE_JITTER)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_greenspace_pieces() {
        assert_eq!(ndvi_to_greenspace(-0.4), 0.0);
        assert!((ndvi_to_greenspace(0.2) - 10.0).abs() < EPS);
        assert!((ndvi_to_greenspace(0.3) - 15.0).abs() < EPS);
        assert!((ndvi_to_greenspace(0.5) - 35.0).abs() < EPS);
        assert!((ndvi_to_greenspace(0.6) - 45.0).abs() < EPS);
        assert!((ndvi_to_greenspace(0.8) - 72.5).abs() < EPS);
        assert!((ndvi_to_greenspace(1.0) - 100.0).abs() < EPS);
    }

    #[test]
    fn test_water_quality_pieces() {
        assert!((ndwi_to_water_quality(0.6) - 100.0).abs() < EPS);
        assert!((ndwi_to_water_quality(0.51) - 95.5).abs() < EPS);
        assert!((ndwi_to_water_quality(0.5) - 75.0).abs() < EPS);
        assert!((ndwi_to_water_quality(0.2) - 60.0).abs() < EPS);
        assert!((ndwi_to_water_quality(0.0) - 30.0).abs() < EPS);
        assert!((ndwi_to_water_quality(-0.5) - 5.0).abs() < EPS);
        assert_eq!(ndwi_to_water_quality(-1.0), 0.0);
    }

    #[test]
    fn test_scores_stay_in_range_over_domain() {
        for i in 0..=2000 {
            let index = -1.0 + i as f64 * 0.001;
            let green = ndvi_to_greenspace(index);
            let water = ndwi_to_water_quality(index);
            assert!((0.0..=100.0).contains(&green), "greenspace {} at {}", green, index);
            assert!((0.0..=100.0).contains(&water), "water {} at {}", water, index);
        }
    }

    #[test]
    fn test_nan_index_scores_zero() {
        assert_eq!(ndvi_to_greenspace(f64::NAN), 0.0);
        assert_eq!(ndwi_to_water_quality(f64::NAN), 0.0);
        assert_eq!(DomainScore::new(f64::NAN).value, 0.0);
    }

    #[test]
    fn test_domain_score_clamps_and_categorizes() {
        let score = DomainScore::new(130.0);
        assert_eq!(score.value, 100.0);
        assert_eq!(score.category, ScoreCategory::Excellent);
        assert_eq!(DomainScore::new(-3.0).category, ScoreCategory::VeryPoor);
        assert_eq!(DomainScore::new(45.0).color().to_hex(), "#fee08b");
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(ScoringStrategy::from_str("DIRECT_ESTIMATE"), ScoringStrategy::DirectEstimate);
        assert_eq!(ScoringStrategy::from_str("estimate"), ScoringStrategy::DirectEstimate);
        assert_eq!(ScoringStrategy::from_str("direct-estimate"), ScoringStrategy::DirectEstimate);
        assert_eq!(ScoringStrategy::from_str("Direct_Estimate"), ScoringStrategy::DirectEstimate);
        assert_eq!(ScoringStrategy::from_str(" direct "), ScoringStrategy::DirectEstimate);
        assert_eq!(ScoringStrategy::from_str("spectral-index"), ScoringStrategy::SpectralIndex);
        assert_eq!(ScoringStrategy::from_str("spectral_index"), ScoringStrategy::SpectralIndex);
        assert_eq!(ScoringStrategy::from_str("bogus"), ScoringStrategy::SpectralIndex);
    }

    #[test]
    fn test_estimate_base_adjustments() {
        assert_eq!(estimate_base(LandCover::default()), (60.0, 40.0));
        let urban_coast = LandCover {
            urban: true,
            vegetated: false,
            coastal: true,
        };
        assert_eq!(estimate_base(urban_coast), (55.0, 15.0));
    }

    #[test]
    fn test_estimate_without_jitter_is_base() {
        let sonoma = Location { lat: 38.5, lon: -122.9 };
        let scores = estimate_scores(&sonoma, &mut JitterRng::midpoint());
        assert!((scores.water_quality.value - 60.0).abs() < EPS);
        assert!((scores.greenspace.value - 40.0).abs() < EPS);
    }

    #[test]
    fn test_estimate_jitter_bounded() {
        let sonoma = Location { lat: 38.5, lon: -122.9 };
        let mut rng = JitterRng::seeded(11);
        for _ in 0..500 {
            let scores = estimate_scores(&sonoma, &mut rng);
            assert!((54.0..=66.0).contains(&scores.water_quality.value));
            assert!((36.0..=44.0).contains(&scores.greenspace.value));
        }
    }
}
