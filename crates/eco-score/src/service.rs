//! High-level scoring service.
//!
//! `EcoScoreService` is the entry point the map layer talks to. It owns the
//! data source, the scoring configuration and the band / prediction caches.
//!
//! # Example
//!
//! ```rust,ignore
//! use eco_score::{EcoScoreService, ScoringConfig};
//!
//! let service = EcoScoreService::from_config(ScoringConfig::from_env())?;
//!
//! let score = service.score_location(38.5, -122.9, None).await?;
//! println!("{} ({})", score.eco_score, score.source);
//!
//! let tracts = generate_grid(&bbox, 10, 10)?;
//! let scored = service.score_batch(tracts).await?;
//! let at_risk = service.predict_batch(scored, None).await?;
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use eco_common::{EcoResult, Location};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::aggregate::{batch_percentiles, eco_score};
use crate::cache::{CacheKey, CacheStats, ScoreCache};
use crate::config::ScoringConfig;
use crate::indices::SpectralIndices;
use crate::rng::SeededJitter;
use crate::score::{estimate_scores, DomainScores, ScoringStrategy};
use crate::source::{DataSource, FallbackChain, RasterScene, RasterSource, SimulatedSource, SourceKind, SourcedBands};
use crate::tract::Tract;
use crate::trend::{project, Prediction};
use crate::types::{Comparison, LocationScore};

/// Stream name for direct-estimate jitter.
const ESTIMATE_STREAM: &str = "estimate";

/// Provider reported for direct estimates, which use no band data.
const ESTIMATE_PROVIDER: &str = "estimate";

/// Cache discriminator for requests without an acquisition date.
const LATEST: &str = "latest";

/// Cache shared between services.
pub type SharedCache<V> = Arc<RwLock<ScoreCache<CacheKey, V>>>;

/// Statistics for both service caches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceCacheStats {
    pub bands: CacheStats,
    pub predictions: CacheStats,
}

/// Scoring pipeline facade: bands → indices → scores → eco score → projection.
pub struct EcoScoreService {
    config: ScoringConfig,
    jitter: SeededJitter,
    source: Arc<dyn DataSource>,
    band_cache: SharedCache<SourcedBands>,
    prediction_cache: SharedCache<Prediction>,
}

impl EcoScoreService {
    /// Create a service over `source` with fresh caches sized from `config`.
    pub fn new(config: ScoringConfig, source: Arc<dyn DataSource>) -> Self {
        let policy = config.eviction_policy();
        Self::with_caches(
            config,
            source,
            Arc::new(RwLock::new(ScoreCache::new(policy))),
            Arc::new(RwLock::new(ScoreCache::new(policy))),
        )
    }

    /// Create a service with caches owned by the caller.
    ///
    /// Useful when several services should share results, or when a test
    /// wants to inspect cache contents directly.
    pub fn with_caches(
        config: ScoringConfig,
        source: Arc<dyn DataSource>,
        band_cache: SharedCache<SourcedBands>,
        prediction_cache: SharedCache<Prediction>,
    ) -> Self {
        Self {
            jitter: config.jitter(),
            config,
            source,
            band_cache,
            prediction_cache,
        }
    }

    /// Build the default source chain from configuration.
    ///
    /// The chain tries the raster scene at `raster_path` (when set) and
    /// falls back to simulated bands.
    pub fn from_config(config: ScoringConfig) -> EcoResult<Self> {
        config.validate()?;

        let mut chain = FallbackChain::new();
        if let Some(path) = &config.raster_path {
            let scene = RasterScene::from_file(path)?;
            info!(
                scene = %scene.name,
                width = scene.width,
                height = scene.height,
                "loaded raster scene"
            );
            chain = chain.with_source(Arc::new(
                RasterSource::new(scene).with_date_tolerance(config.raster_date_tolerance_days),
            ));
        }
        chain = chain.with_source(Arc::new(SimulatedSource::new(config.jitter())));

        info!(
            sources = ?chain.source_names(),
            strategy = %config.strategy,
            seed = config.seed,
            "eco score service ready"
        );
        Ok(Self::new(config, Arc::new(chain)))
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Name of the top-level data source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Fetch bands for a location, consulting the band cache first.
    pub async fn fetch_bands(
        &self,
        lat: f64,
        lon: f64,
        date: Option<NaiveDate>,
    ) -> EcoResult<SourcedBands> {
        let location = Location::new(lat, lon)?;
        self.fetch_bands_at(&location, date).await
    }

    /// Score a single location with the configured strategy.
    pub async fn score_location(
        &self,
        lat: f64,
        lon: f64,
        date: Option<NaiveDate>,
    ) -> EcoResult<LocationScore> {
        let location = Location::new(lat, lon)?;
        self.score_at(&location, date).await
    }

    /// Score every tract and rank it within the batch.
    ///
    /// Percentiles are relative to this batch only and must be recomputed
    /// whenever its membership changes.
    #[instrument(skip(self, tracts), fields(count = tracts.len()))]
    pub async fn score_batch(&self, mut tracts: Vec<Tract>) -> EcoResult<Vec<Tract>> {
        let total = tracts.len();
        let chunk = self.config.batch_chunk_size.max(1);
        let mut real = 0usize;

        for (i, tract) in tracts.iter_mut().enumerate() {
            let score = self.score_at(&tract.centroid, None).await?;
            if score.source == SourceKind::Real {
                real += 1;
            }
            tract.properties.water_quality = Some(score.water_quality);
            tract.properties.greenspace = Some(score.greenspace);
            tract.properties.eco_score = Some(score.eco_score);
            tract.properties.source = Some(score.source);

            let processed = i + 1;
            if processed % chunk == 0 && processed < total {
                debug!(processed, total, "scoring tracts");
            }
        }

        let scores: Vec<f64> = tracts
            .iter()
            .map(|t| t.properties.eco_score.unwrap_or(0.0))
            .collect();
        for (tract, percentile) in tracts.iter_mut().zip(batch_percentiles(&scores)) {
            tract.properties.eco_percentile = Some(percentile);
        }

        info!(total, real, simulated = total - real, "scored tract batch");
        Ok(tracts)
    }

    /// Project a tract's eco score forward.
    ///
    /// Uses the tract's existing eco score when present, otherwise scores
    /// its centroid first. `years_ahead` defaults to the configured horizon.
    pub async fn predict(&self, tract: &Tract, years_ahead: Option<u32>) -> EcoResult<Prediction> {
        let years = years_ahead.unwrap_or(self.config.years_ahead);
        let current = match tract.properties.eco_score {
            Some(score) => score,
            None => self.score_at(&tract.centroid, None).await?.eco_score,
        };

        let key = CacheKey::new(
            &tract.centroid,
            self.config.cache_precision,
            format!("{}y:{:016x}", years, current.to_bits()),
        );
        if let Some(cached) = self.prediction_cache.write().await.get(&key) {
            return Ok(cached);
        }

        let prediction = project(current, &tract.centroid, years)?;
        debug!(
            tract = %tract.id,
            current = prediction.current_score,
            predicted = prediction.predicted_score,
            risk = %prediction.risk_level,
            "projected tract"
        );
        self.prediction_cache
            .write()
            .await
            .insert(key, prediction.clone());
        Ok(prediction)
    }

    /// Attach a prediction to every tract, keeping the input order.
    pub async fn annotate_predictions(
        &self,
        mut tracts: Vec<Tract>,
        years_ahead: Option<u32>,
    ) -> EcoResult<Vec<Tract>> {
        for tract in tracts.iter_mut() {
            let prediction = self.predict(tract, years_ahead).await?;
            tract.properties.prediction = Some(prediction);
        }
        Ok(tracts)
    }

    /// Tracts needing intervention, most urgent first.
    ///
    /// Every tract is projected; only those at critical or high risk are
    /// returned, ordered by risk level and then by lowest projected score.
    #[instrument(skip(self, tracts), fields(count = tracts.len()))]
    pub async fn predict_batch(
        &self,
        tracts: Vec<Tract>,
        years_ahead: Option<u32>,
    ) -> EcoResult<Vec<Tract>> {
        let total = tracts.len();
        let mut flagged: Vec<Tract> = self
            .annotate_predictions(tracts, years_ahead)
            .await?
            .into_iter()
            .filter(|t| t.properties.prediction.as_ref().is_some_and(|p| p.needs_action))
            .collect();

        flagged.sort_by(|a, b| match (&a.properties.prediction, &b.properties.prediction) {
            (Some(pa), Some(pb)) => pa.priority_cmp(pb),
            _ => std::cmp::Ordering::Equal,
        });

        info!(total, flagged = flagged.len(), "projected tract batch");
        Ok(flagged)
    }

    /// Score two locations and report which is healthier.
    pub async fn compare_locations(
        &self,
        first: Location,
        second: Location,
        date: Option<NaiveDate>,
    ) -> EcoResult<Comparison> {
        let a = self.score_at(&first, date).await?;
        let b = self.score_at(&second, date).await?;
        Ok(Comparison::new(a, b))
    }

    pub async fn cache_stats(&self) -> ServiceCacheStats {
        ServiceCacheStats {
            bands: self.band_cache.read().await.stats(),
            predictions: self.prediction_cache.read().await.stats(),
        }
    }

    /// Empty both caches.
    ///
    /// Returns the number of entries removed.
    pub async fn clear_caches(&self) -> usize {
        let mut bands = self.band_cache.write().await;
        let mut predictions = self.prediction_cache.write().await;
        let cleared = bands.len() + predictions.len();
        bands.clear();
        predictions.clear();
        info!(cleared, "cleared score caches");
        cleared
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    async fn fetch_bands_at(
        &self,
        location: &Location,
        date: Option<NaiveDate>,
    ) -> EcoResult<SourcedBands> {
        let discriminator = date.map_or_else(|| LATEST.to_string(), |d| d.to_string());
        let key = CacheKey::new(location, self.config.cache_precision, discriminator);

        if let Some(cached) = self.band_cache.write().await.get(&key) {
            return Ok(cached);
        }

        let bands = self.source.fetch_bands(location, date).await?;
        debug!(
            %location,
            source = %bands.source,
            provider = %bands.provider,
            "fetched bands"
        );
        self.band_cache.write().await.insert(key, bands.clone());
        Ok(bands)
    }

    async fn score_at(&self, location: &Location, date: Option<NaiveDate>) -> EcoResult<LocationScore> {
        location.validate()?;

        let (scores, source, provider) = match self.config.strategy {
            ScoringStrategy::SpectralIndex => {
                let sourced = self.fetch_bands_at(location, date).await?;
                let indices = SpectralIndices::from_bands(&sourced.bands, self.config.savi_l);
                (DomainScores::from_indices(&indices), sourced.source, sourced.provider)
            }
            ScoringStrategy::DirectEstimate => {
                let mut rng = self.jitter.rng_for(location, ESTIMATE_STREAM);
                (
                    estimate_scores(location, &mut rng),
                    SourceKind::Simulated,
                    ESTIMATE_PROVIDER.to_string(),
                )
            }
        };

        let water_quality = scores.water_quality.value;
        let greenspace = scores.greenspace.value;
        Ok(LocationScore {
            location: *location,
            water_quality,
            greenspace,
            eco_score: eco_score(water_quality, greenspace),
            source,
            provider,
            strategy: self.config.strategy,
        })
    }
}
