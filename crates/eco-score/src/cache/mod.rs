//! Cache implementations for pipeline results.

mod score_cache;

pub use score_cache::{CacheKey, CacheStats, EvictionPolicy, ScoreCache};
