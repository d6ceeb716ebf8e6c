//! Synthetic band source.

use async_trait::async_trait;
use chrono::NaiveDate;
use eco_common::{EcoResult, Location};

use super::{DataSource, SourceKind, SourcedBands};
use crate::bands::synthesize;
use crate::rng::SeededJitter;

/// Stream name separating band jitter from other per-location draws.
pub(crate) const BAND_STREAM: &str = "bands";

/// Always-available source that synthesizes bands from the location alone.
///
/// The acquisition date is ignored; the same location always yields the
/// same sample for a given jitter seed.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    jitter: SeededJitter,
}

impl SimulatedSource {
    pub fn new(jitter: SeededJitter) -> Self {
        Self { jitter }
    }
}

#[async_trait]
impl DataSource for SimulatedSource {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn fetch_bands(
        &self,
        location: &Location,
        _date: Option<NaiveDate>,
    ) -> EcoResult<SourcedBands> {
        location.validate()?;
        let mut rng = self.jitter.rng_for(location, BAND_STREAM);
        Ok(SourcedBands {
            bands: synthesize(location, &mut rng),
            source: SourceKind::Simulated,
            provider: self.name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_source_is_reproducible() {
        let source = SimulatedSource::new(SeededJitter::new(5));
        let loc = Location::new(38.5, -122.9).unwrap();
        let a = source.fetch_bands(&loc, None).await.unwrap();
        let b = source
            .fetch_bands(&loc, NaiveDate::from_ymd_opt(2024, 6, 1))
            .await
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.source, SourceKind::Simulated);
        assert_eq!(a.provider, "simulated");
    }

    #[tokio::test]
    async fn test_simulated_source_rejects_bad_coordinates() {
        let source = SimulatedSource::new(SeededJitter::disabled());
        let bad = Location { lat: 120.0, lon: 0.0 };
        assert!(source.fetch_bands(&bad, None).await.is_err());
    }
}
