//! Report assembly for the command-line front end.

use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use eco_common::Location;
use eco_score::{SourceKind, Tract};
use serde::Serialize;

/// Parse `"lat,lon"` into a validated location.
pub fn parse_location(s: &str) -> Result<Location> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected 'lat,lon', got '{}'", s))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("invalid latitude in '{}'", s))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .with_context(|| format!("invalid longitude in '{}'", s))?;
    Ok(Location::new(lat, lon)?)
}

/// Aggregate view of a scored (and optionally projected) tract batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSummary {
    pub tracts: usize,
    pub mean_eco_score: f64,
    pub min_eco_score: f64,
    pub max_eco_score: f64,
    pub real_sources: usize,
    pub categories: BTreeMap<String, usize>,
    pub risk_levels: BTreeMap<String, usize>,
    pub needs_action: usize,
}

impl GridSummary {
    pub fn from_tracts(tracts: &[Tract]) -> Self {
        let scores: Vec<f64> = tracts
            .iter()
            .filter_map(|t| t.properties.eco_score)
            .collect();

        let mut categories = BTreeMap::new();
        let mut risk_levels = BTreeMap::new();
        let mut needs_action = 0;
        for tract in tracts {
            if let Some(category) = tract.category() {
                *categories.entry(category.label().to_string()).or_insert(0) += 1;
            }
            if let Some(prediction) = &tract.properties.prediction {
                *risk_levels
                    .entry(prediction.risk_level.as_str().to_string())
                    .or_insert(0) += 1;
                if prediction.needs_action {
                    needs_action += 1;
                }
            }
        }

        let (min, max, mean) = if scores.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                scores.iter().copied().fold(f64::INFINITY, f64::min),
                scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                scores.iter().sum::<f64>() / scores.len() as f64,
            )
        };

        Self {
            tracts: tracts.len(),
            mean_eco_score: mean,
            min_eco_score: min,
            max_eco_score: max,
            real_sources: tracts
                .iter()
                .filter(|t| t.properties.source == Some(SourceKind::Real))
                .count(),
            categories,
            risk_levels,
            needs_action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_common::BoundingBox;
    use eco_score::{generate_grid, EcoScoreService, ScoringConfig};

    #[test]
    fn test_parse_location() {
        let loc = parse_location("38.5, -122.9").unwrap();
        assert_eq!(loc.lat, 38.5);
        assert_eq!(loc.lon, -122.9);
        assert!(parse_location("38.5").is_err());
        assert!(parse_location("abc,1").is_err());
        assert!(parse_location("95,0").is_err());
    }

    #[test]
    fn test_summary_of_empty_batch() {
        let summary = GridSummary::from_tracts(&[]);
        assert_eq!(summary.tracts, 0);
        assert_eq!(summary.mean_eco_score, 0.0);
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let service = EcoScoreService::from_config(ScoringConfig::default()).unwrap();
        let tracts = generate_grid(&BoundingBox::new(-123.0, 38.3, -122.8, 38.7), 2, 3).unwrap();
        let annotated = tokio_test::block_on(async {
            let scored = service.score_batch(tracts).await?;
            service.annotate_predictions(scored, None).await
        })
        .unwrap();

        let summary = GridSummary::from_tracts(&annotated);
        assert_eq!(summary.tracts, 6);
        assert_eq!(summary.categories.values().sum::<usize>(), 6);
        assert_eq!(summary.risk_levels.values().sum::<usize>(), 6);
        assert_eq!(summary.real_sources, 0);
        assert!(summary.min_eco_score <= summary.mean_eco_score);
        assert!(summary.mean_eco_score <= summary.max_eco_score);
    }
}
