//! Keyed result cache with a pluggable eviction policy.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use eco_common::Location;
use lru::LruCache;
use serde::{Deserialize, Serialize};

/// When entries leave the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum EvictionPolicy {
    /// Grow without bound; entries live until `clear()`.
    #[default]
    Never,
    /// Keep at most `capacity` entries, dropping the least recently used.
    Lru { capacity: usize },
}

impl EvictionPolicy {
    /// `0` means never evict.
    pub fn from_capacity(capacity: usize) -> Self {
        if capacity == 0 {
            Self::Never
        } else {
            Self::Lru { capacity }
        }
    }
}

/// Cache key: a location rounded to a fixed number of decimals plus a
/// free-form discriminator (acquisition date, projection horizon, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub lat: i64,
    pub lon: i64,
    pub discriminator: String,
}

impl CacheKey {
    pub fn new(location: &Location, precision: u32, discriminator: impl Into<String>) -> Self {
        let (lat, lon) = location.quantize(precision);
        Self {
            lat,
            lon,
            discriminator: discriminator.into(),
        }
    }
}

/// Statistics about a cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 - 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// In-memory cache for pipeline results.
pub struct ScoreCache<K: Hash + Eq, V> {
    cache: LruCache<K, V>,
    policy: EvictionPolicy,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K: Hash + Eq, V: Clone> ScoreCache<K, V> {
    pub fn new(policy: EvictionPolicy) -> Self {
        let cache = match policy {
            EvictionPolicy::Lru { capacity } => match NonZeroUsize::new(capacity) {
                Some(cap) => LruCache::new(cap),
                None => LruCache::unbounded(),
            },
            EvictionPolicy::Never => LruCache::unbounded(),
        };
        Self {
            cache,
            policy,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Look up a value, counting the hit or miss.
    pub fn get(&mut self, key: &K) -> Option<V> {
        if let Some(value) = self.cache.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            Some(value.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Check if a key exists without updating recency or statistics.
    pub fn contains(&self, key: &K) -> bool {
        self.cache.contains(key)
    }

    /// Insert a value, evicting the least recently used entry if at capacity.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some((evicted_key, _)) = self.cache.push(key, value) {
            // push also returns the old entry when the key was already present
            if !self.cache.contains(&evicted_key) {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.len(),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Remove every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(lat: f64, lon: f64, d: &str) -> CacheKey {
        CacheKey::new(&Location { lat, lon }, 4, d)
    }

    #[test]
    fn test_cache_insert_and_get() {
        let mut cache: ScoreCache<CacheKey, f64> = ScoreCache::new(EvictionPolicy::Never);
        let k = key(38.5, -122.9, "");
        assert!(cache.get(&k).is_none());
        cache.insert(k.clone(), 42.0);
        assert_eq!(cache.get(&k), Some(42.0));
    }

    #[test]
    fn test_key_rounding() {
        assert_eq!(key(38.50001, -122.9, "x"), key(38.5, -122.90004, "x"));
        assert_ne!(key(38.5, -122.9, "x"), key(38.5, -122.9, "y"));
        assert_ne!(key(38.5, -122.9, "x"), key(38.501, -122.9, "x"));
    }

    #[test]
    fn test_never_policy_does_not_evict() {
        let mut cache: ScoreCache<u32, u32> = ScoreCache::new(EvictionPolicy::Never);
        for i in 0..10_000 {
            cache.insert(i, i);
        }
        assert_eq!(cache.len(), 10_000);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_lru_policy_evicts_oldest() {
        let mut cache: ScoreCache<u32, u32> = ScoreCache::new(EvictionPolicy::Lru { capacity: 3 });
        for i in 0..5 {
            cache.insert(i, i);
        }
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&0));
        assert!(!cache.contains(&1));
        assert!(cache.contains(&4));
        assert_eq!(cache.stats().evictions, 2);
    }

    #[test]
    fn test_replacing_a_key_is_not_an_eviction() {
        let mut cache: ScoreCache<u32, u32> = ScoreCache::new(EvictionPolicy::Lru { capacity: 2 });
        cache.insert(1, 1);
        cache.insert(1, 2);
        assert_eq!(cache.get(&1), Some(2));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_cache_stats() {
        let mut cache: ScoreCache<u32, u32> = ScoreCache::new(EvictionPolicy::default());
        cache.insert(1, 10);
        cache.get(&1);
        cache.get(&2);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cache_clear() {
        let mut cache: ScoreCache<u32, u32> = ScoreCache::new(EvictionPolicy::Never);
        cache.insert(1, 1);
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_policy_from_capacity() {
        assert_eq!(EvictionPolicy::from_capacity(0), EvictionPolicy::Never);
        assert_eq!(
            EvictionPolicy::from_capacity(8),
            EvictionPolicy::Lru { capacity: 8 }
        );
    }
}
