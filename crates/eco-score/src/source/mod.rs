//! Band data sources.
//!
//! [`DataSource`] is the seam where satellite band retrieval attaches. The
//! pipeline only ever talks to the trait, so a network-backed source can
//! replace the in-memory ones without touching callers. Sources are
//! composed with [`FallbackChain`]: real sources first, simulation last,
//! and every result says which kind of source produced it.

mod fallback;
mod raster;
mod simulated;

pub use fallback::FallbackChain;
pub use raster::{RasterScene, RasterSource};
pub use simulated::SimulatedSource;

use async_trait::async_trait;
use chrono::NaiveDate;
use eco_common::{EcoResult, Location};
use serde::{Deserialize, Serialize};

use crate::bands::BandSample;

/// Whether bands came from observed data or were synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Real,
    Simulated,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Simulated => "simulated",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bands tagged with their provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedBands {
    pub bands: BandSample,
    pub source: SourceKind,
    /// Name of the source that answered.
    pub provider: String,
}

/// Trait for fetching band samples at a location.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short name used in logs and on results.
    fn name(&self) -> &str;

    /// Fetch the five bands at `location`, optionally for a specific acquisition date.
    ///
    /// Returns `DataNotAvailable` or `DataReadError` when this source cannot
    /// answer, which lets a [`FallbackChain`] try the next source. Invalid
    /// coordinates fail with `InvalidCoordinates` from every source.
    async fn fetch_bands(&self, location: &Location, date: Option<NaiveDate>)
        -> EcoResult<SourcedBands>;
}
