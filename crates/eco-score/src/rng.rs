//! Reproducible randomness for the simulated parts of the pipeline.
//!
//! Nothing in the pipeline calls an ambient RNG. Callers hand a
//! [`JitterRng`] to the pure functions, and the service derives one per
//! location from a [`SeededJitter`], so a location always receives the same
//! noise no matter how many other locations were scored before it.

use eco_common::Location;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Decimal places of the lat/lon buckets jitter is keyed on (0.01 degrees).
pub const JITTER_BUCKET_DECIMALS: u32 = 2;

/// Source of uniform noise.
#[derive(Debug, Clone)]
pub enum JitterRng {
    /// Pseudo-random draws.
    Seeded(StdRng),
    /// Every draw returns the same fraction of the requested range (0.5 is the midpoint).
    Fixed(f64),
}

impl JitterRng {
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(StdRng::seed_from_u64(seed))
    }

    pub fn midpoint() -> Self {
        Self::Fixed(0.5)
    }

    /// A draw in `[0, 1)` (or the fixed fraction).
    pub fn unit(&mut self) -> f64 {
        match self {
            Self::Seeded(rng) => rng.gen::<f64>(),
            Self::Fixed(t) => t.clamp(0.0, 1.0),
        }
    }

    /// A draw in `[low, high)`.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.unit() * (high - low)
    }

    /// A multiplicative factor in `[1 - spread, 1 + spread)`.
    pub fn factor(&mut self, spread: f64) -> f64 {
        self.uniform(1.0 - spread, 1.0 + spread)
    }
}

/// How the service derives per-location noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum SeededJitter {
    /// Per-location `StdRng` seeded from `hash(seed, lat bucket, lon bucket, stream)`.
    Seeded { seed: u64 },
    /// No noise; every draw is the midpoint of its range.
    Disabled,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self::Seeded { seed }
    }

    pub fn disabled() -> Self {
        Self::Disabled
    }

    /// Derive the noise source for one location.
    ///
    /// `stream` separates independent draws at the same location (bands
    /// versus direct estimates) so they do not share a sequence.
    pub fn rng_for(&self, location: &Location, stream: &str) -> JitterRng {
        match self {
            Self::Seeded { seed } => {
                let (lat, lon) = location.quantize(JITTER_BUCKET_DECIMALS);
                let mut h = splitmix64(*seed);
                h = splitmix64(h ^ lat as u64);
                h = splitmix64(h ^ lon as u64);
                h = splitmix64(h ^ stream_id(stream));
                JitterRng::seeded(h)
            }
            Self::Disabled => JitterRng::midpoint(),
        }
    }
}

impl Default for SeededJitter {
    fn default() -> Self {
        Self::new(42)
    }
}

/// SplitMix64 finalizer. Fixed constants keep derived seeds identical
/// across platforms and toolchains.
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// FNV-1a over the stream name.
fn stream_id(stream: &str) -> u64 {
    stream.bytes().fold(0xcbf2_9ce4_8422_2325, |h, b| {
        (h ^ b as u64).wrapping_mul(0x0100_0000_01b3)
    })
}
