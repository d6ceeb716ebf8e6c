//! Configuration for the scoring pipeline.

use std::path::PathBuf;

use eco_common::{EcoError, EcoResult};
use serde::{Deserialize, Serialize};

use crate::cache::EvictionPolicy;
use crate::indices::DEFAULT_SAVI_L;
use crate::rng::SeededJitter;
use crate::score::ScoringStrategy;
use crate::trend::DEFAULT_YEARS_AHEAD;

/// Configuration for [`EcoScoreService`](crate::EcoScoreService).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Which path produces domain scores.
    pub strategy: ScoringStrategy,

    /// Seed for all simulated noise.
    pub seed: u64,

    /// Disable noise entirely (every draw is the midpoint of its range).
    pub jitter_enabled: bool,

    /// Soil brightness correction for SAVI, in `[0, 1]`.
    pub savi_l: f64,

    /// Default projection horizon in years.
    pub years_ahead: u32,

    /// Maximum entries per cache; 0 never evicts.
    pub cache_capacity: usize,

    /// Decimal places lat/lon are rounded to in cache keys.
    pub cache_precision: u32,

    /// Number of tracts between batch progress log lines.
    pub batch_chunk_size: usize,

    /// Optional band scene JSON used as the real data source.
    pub raster_path: Option<PathBuf>,

    /// Days a request date may differ from the scene acquisition date.
    pub raster_date_tolerance_days: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            strategy: ScoringStrategy::SpectralIndex,
            seed: 42,
            jitter_enabled: true,
            savi_l: DEFAULT_SAVI_L,
            years_ahead: DEFAULT_YEARS_AHEAD,
            cache_capacity: 0,
            cache_precision: 4,
            batch_chunk_size: 100,
            raster_path: None,
            raster_date_tolerance_days: 16,
        }
    }
}

impl ScoringConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable variables keep their defaults; call
    /// [`validate`](Self::validate) afterwards.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ECO_SCORING_STRATEGY") {
            config.strategy = ScoringStrategy::from_str(&val);
        }

        if let Ok(val) = std::env::var("ECO_RNG_SEED") {
            if let Ok(seed) = val.parse() {
                config.seed = seed;
            }
        }

        if let Ok(val) = std::env::var("ECO_JITTER") {
            config.jitter_enabled = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("ECO_SAVI_L") {
            if let Ok(l) = val.parse() {
                config.savi_l = l;
            }
        }

        if let Ok(val) = std::env::var("ECO_PREDICTION_YEARS") {
            if let Ok(years) = val.parse() {
                config.years_ahead = years;
            }
        }

        if let Ok(val) = std::env::var("ECO_CACHE_CAPACITY") {
            if let Ok(capacity) = val.parse() {
                config.cache_capacity = capacity;
            }
        }

        if let Ok(val) = std::env::var("ECO_CACHE_PRECISION") {
            if let Ok(precision) = val.parse() {
                config.cache_precision = precision;
            }
        }

        if let Ok(val) = std::env::var("ECO_BATCH_CHUNK_SIZE") {
            if let Ok(size) = val.parse() {
                config.batch_chunk_size = size;
            }
        }

        if let Ok(val) = std::env::var("ECO_RASTER_PATH") {
            if !val.is_empty() {
                config.raster_path = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = std::env::var("ECO_RASTER_DATE_TOLERANCE_DAYS") {
            if let Ok(days) = val.parse() {
                config.raster_date_tolerance_days = days;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> EcoResult<()> {
        if !(0.0..=1.0).contains(&self.savi_l) {
            return Err(EcoError::ConfigError(format!(
                "savi_l must be within [0, 1], got {}",
                self.savi_l
            )));
        }

        if self.years_ahead == 0 {
            return Err(EcoError::ConfigError("years_ahead must be > 0".to_string()));
        }

        if self.cache_precision > 8 {
            return Err(EcoError::ConfigError(format!(
                "cache_precision must be <= 8, got {}",
                self.cache_precision
            )));
        }

        if self.batch_chunk_size == 0 {
            return Err(EcoError::ConfigError(
                "batch_chunk_size must be > 0".to_string(),
            ));
        }

        if self.raster_date_tolerance_days < 0 {
            return Err(EcoError::ConfigError(
                "raster_date_tolerance_days must be >= 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Noise source derived from `seed` and `jitter_enabled`.
    pub fn jitter(&self) -> SeededJitter {
        if self.jitter_enabled {
            SeededJitter::new(self.seed)
        } else {
            SeededJitter::disabled()
        }
    }

    pub fn eviction_policy(&self) -> EvictionPolicy {
        EvictionPolicy::from_capacity(self.cache_capacity)
    }
}
