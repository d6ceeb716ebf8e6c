//! Rule-based projection of eco scores into the future.
//!
//! There is no learned model here: a location's annual decline is the sum
//! of three table lookups (trend class, region, urban pressure) and the
//! projection is a straight line from the current score, clamped to
//! `[0, 100]`.

use std::cmp::Ordering;

use eco_common::{EcoError, EcoResult, Location};
use serde::{Deserialize, Serialize};

use crate::regions;

pub const DEFAULT_YEARS_AHEAD: u32 = 15;

pub const URBAN_PRESSURE: f64 = -1.2;
pub const SUBURBAN_PRESSURE: f64 = -0.8;
pub const RURAL_PRESSURE: f64 = -0.3;

/// Coarse long-term trend of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendClass {
    Declining,
    AtRisk,
    Stable,
    SlightDecline,
}

impl TrendClass {
    /// Ordered checks, first match wins: urban, protected, coastal, default.
    pub fn classify(location: &Location) -> Self {
        if regions::is_urban(location) {
            Self::Declining
        } else if regions::is_protected(location) {
            Self::Stable
        } else if regions::is_coastal(location) {
            Self::AtRisk
        } else {
            Self::SlightDecline
        }
    }

    /// Baseline score change per year for this trend.
    pub fn base_decline(&self) -> f64 {
        match self {
            Self::Declining => -1.5,
            Self::AtRisk => -1.0,
            Self::SlightDecline => -0.5,
            Self::Stable => -0.1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Declining => "declining",
            Self::AtRisk => "at_risk",
            Self::Stable => "stable",
            Self::SlightDecline => "slight_decline",
        }
    }
}

/// Four-tier severity of a projected decline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Critical,
    High,
    Moderate,
    Low,
}

impl RiskLevel {
    /// Sort rank, most severe first.
    pub fn order(&self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Moderate => 2,
            Self::Low => 3,
        }
    }

    pub fn needs_action(&self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }

    /// Classify from the current and projected scores.
    ///
    /// The thresholds on the projected score are strict: exactly 30 is not
    /// critical and exactly 50 is not high.
    pub fn classify(current_score: f64, predicted_score: f64, years_ahead: u32) -> Self {
        let decline_rate = if years_ahead == 0 {
            0.0
        } else {
            (current_score - predicted_score) / years_ahead as f64
        };

        if predicted_score < 30.0 || decline_rate > 2.0 {
            Self::Critical
        } else if predicted_score < 50.0 || decline_rate > 1.5 {
            Self::High
        } else if decline_rate > 0.5 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urban pressure contribution: urban, else suburban, else rural.
pub fn urban_pressure_factor(location: &Location) -> f64 {
    if regions::is_urban(location) {
        URBAN_PRESSURE
    } else if regions::is_suburban(location) {
        SUBURBAN_PRESSURE
    } else {
        RURAL_PRESSURE
    }
}

/// Projected eco score for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub current_score: f64,
    pub predicted_score: f64,
    pub years_ahead: u32,
    pub annual_decline: f64,
    pub risk_level: RiskLevel,
    pub needs_action: bool,
    pub trend: TrendClass,
    pub region: String,
    pub regional_factor: f64,
    pub urban_pressure: f64,
}

impl Prediction {
    /// Average points lost per year over the horizon, after clamping.
    pub fn decline_rate(&self) -> f64 {
        if self.years_ahead == 0 {
            0.0
        } else {
            (self.current_score - self.predicted_score) / self.years_ahead as f64
        }
    }

    /// Yearly `(year_offset, score)` points from now to the horizon, for charting.
    pub fn series(&self) -> Vec<(u32, f64)> {
        (0..=self.years_ahead)
            .map(|year| {
                let score = self.current_score + self.annual_decline * year as f64;
                (year, score.clamp(0.0, 100.0))
            })
            .collect()
    }

    /// Ordering used to rank tracts for intervention: severity, then lowest projection.
    pub fn priority_cmp(&self, other: &Prediction) -> Ordering {
        self.risk_level
            .order()
            .cmp(&other.risk_level.order())
            .then_with(|| self.predicted_score.total_cmp(&other.predicted_score))
    }
}

/// Project `current_score` at `location` forward by `years_ahead` years.
pub fn project(current_score: f64, location: &Location, years_ahead: u32) -> EcoResult<Prediction> {
    location.validate()?;
    if years_ahead == 0 {
        return Err(EcoError::invalid_parameter(
            "years_ahead",
            "must be at least one year",
        ));
    }
    if !current_score.is_finite() {
        return Err(EcoError::invalid_parameter(
            "current_score",
            format!("must be finite, got {}", current_score),
        ));
    }

    let current_score = current_score.clamp(0.0, 100.0);
    let trend = TrendClass::classify(location);
    let (region, regional_factor) = regions::regional_factor(location);
    let urban_pressure = urban_pressure_factor(location);

    let annual_decline = trend.base_decline() + regional_factor + urban_pressure;
    let predicted_score = (current_score + annual_decline * years_ahead as f64).clamp(0.0, 100.0);
    let risk_level = RiskLevel::classify(current_score, predicted_score, years_ahead);

    Ok(Prediction {
        current_score,
        predicted_score,
        years_ahead,
        annual_decline,
        risk_level,
        needs_action: risk_level.needs_action(),
        trend,
        region: region.to_string(),
        regional_factor,
        urban_pressure,
    })
}
