//! Eco Score Pipeline
//!
//! This crate turns multispectral band samples into environmental health
//! scores for map tracts. It provides:
//!
//! - **Spectral indices**: NDVI, NDWI, MNDWI, EVI and SAVI from five bands
//! - **Domain scores**: water quality and greenspace on a 0-100 scale
//! - **Eco score**: the 50/50 blend, ranked within each batch by percentile
//! - **Trend projection**: rule-based decline forecast and risk level
//! - **Pluggable data**: real sources with a deterministic simulated fallback
//!
//! # Architecture
//!
//! ```text
//! Map viewport
//!      │
//!      ▼
//! generate_grid(bbox) ──► Vec<Tract>
//!      │
//!      ▼
//! EcoScoreService::score_batch(tracts)
//!      │
//!      ├─► SpectralIndex strategy
//!      │         │
//!      │         ├─► Band cache hit: reuse bands
//!      │         │
//!      │         └─► Cache miss: FallbackChain
//!      │                   ├─► RasterSource   (real)
//!      │                   └─► SimulatedSource (simulated)
//!      │         │
//!      │         └─► SpectralIndices ──► DomainScores
//!      │
//!      ├─► DirectEstimate strategy: land cover + seeded jitter
//!      │
//!      └─► eco_score + batch_percentiles
//!               │
//!               ▼
//! EcoScoreService::predict_batch(tracts)
//!      │
//!      └─► project() per tract ──► needs_action tracts, most urgent first
//! ```
//!
//! # Example
//!
//! ```ignore
//! use eco_score::{generate_grid, EcoScoreService, ScoringConfig};
//! use eco_common::BoundingBox;
//!
//! let service = EcoScoreService::from_config(ScoringConfig::default())?;
//!
//! let bbox = BoundingBox::new(-123.0, 38.0, -122.0, 39.0);
//! let tracts = service.score_batch(generate_grid(&bbox, 10, 10)?).await?;
//! let at_risk = service.predict_batch(tracts, Some(15)).await?;
//! ```

pub mod aggregate;
pub mod bands;
pub mod cache;
pub mod config;
pub mod indices;
pub mod regions;
pub mod rng;
pub mod score;
pub mod service;
pub mod source;
pub mod tract;
pub mod trend;
pub mod types;

// Re-export commonly used types at crate root
pub use aggregate::{batch_percentiles, eco_score};
pub use bands::{synthesize, BandSample, Reflectance};
pub use cache::{CacheKey, CacheStats, EvictionPolicy, ScoreCache};
pub use config::ScoringConfig;
pub use indices::SpectralIndices;
pub use regions::LandCover;
pub use rng::{JitterRng, SeededJitter};
pub use score::{estimate_scores, DomainScore, DomainScores, ScoringStrategy};
pub use service::{EcoScoreService, ServiceCacheStats, SharedCache};
pub use source::{
    DataSource, FallbackChain, RasterScene, RasterSource, SimulatedSource, SourceKind,
    SourcedBands,
};
pub use tract::{generate_grid, to_feature_collection, Tract, TractProperties};
pub use trend::{project, Prediction, RiskLevel, TrendClass};
pub use types::{Comparison, LocationScore, Side};
