//! Result types returned by the service.

use eco_common::{Location, ScoreCategory};
use serde::{Deserialize, Serialize};

use crate::score::ScoringStrategy;
use crate::source::SourceKind;

/// Two scores closer than this are reported as a tie.
pub const TIE_THRESHOLD: f64 = 0.5;

/// Scores for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationScore {
    pub location: Location,
    pub water_quality: f64,
    pub greenspace: f64,
    pub eco_score: f64,
    /// Whether the bands came from observed data or the synthesizer.
    pub source: SourceKind,
    /// Name of the source that answered.
    pub provider: String,
    pub strategy: ScoringStrategy,
}

impl LocationScore {
    pub fn category(&self) -> ScoreCategory {
        ScoreCategory::from_score(self.eco_score)
    }
}

/// Which location of a comparison scored higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
    Tie,
}

impl Side {
    /// Sign of `a - b`, with differences under [`TIE_THRESHOLD`] treated as equal.
    pub fn from_difference(difference: f64) -> Self {
        if difference.abs() < TIE_THRESHOLD {
            Side::Tie
        } else if difference > 0.0 {
            Side::First
        } else {
            Side::Second
        }
    }
}

/// Side-by-side scores for two locations. Differences are `first - second`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub first: LocationScore,
    pub second: LocationScore,
    pub water_difference: f64,
    pub greenspace_difference: f64,
    pub eco_difference: f64,
    pub better: Side,
}

impl Comparison {
    pub fn new(first: LocationScore, second: LocationScore) -> Self {
        let water_difference = first.water_quality - second.water_quality;
        let greenspace_difference = first.greenspace - second.greenspace;
        let eco_difference = first.eco_score - second.eco_score;
        Self {
            better: Side::from_difference(eco_difference),
            first,
            second,
            water_difference,
            greenspace_difference,
            eco_difference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(eco: f64) -> LocationScore {
        LocationScore {
            location: Location { lat: 0.0, lon: 0.0 },
            water_quality: eco + 10.0,
            greenspace: eco - 10.0,
            eco_score: eco,
            source: SourceKind::Simulated,
            provider: "simulated".to_string(),
            strategy: ScoringStrategy::DirectEstimate,
        }
    }

    #[test]
    fn test_side_from_difference() {
        assert_eq!(Side::from_difference(0.0), Side::Tie);
        assert_eq!(Side::from_difference(0.49), Side::Tie);
        assert_eq!(Side::from_difference(-0.49), Side::Tie);
        assert_eq!(Side::from_difference(0.5), Side::First);
        assert_eq!(Side::from_difference(-3.0), Side::Second);
    }

    #[test]
    fn test_comparison_differences() {
        let cmp = Comparison::new(score(70.0), score(55.0));
        assert!((cmp.eco_difference - 15.0).abs() < 1e-9);
        assert!((cmp.water_difference - 15.0).abs() < 1e-9);
        assert_eq!(cmp.better, Side::First);

        let reversed = Comparison::new(score(55.0), score(70.0));
        assert_eq!(reversed.better, Side::Second);
    }

    #[test]
    fn test_location_score_serializes_camel_case() {
        let json = serde_json::to_value(score(60.0)).unwrap();
        assert_eq!(json["ecoScore"], 60.0);
        assert_eq!(json["waterQuality"], 70.0);
        assert_eq!(json["source"], "simulated");
        assert_eq!(json["strategy"], "direct_estimate");
    }
}
