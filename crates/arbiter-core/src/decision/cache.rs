//! Bounded result cache with TTL
//!
//! Eviction is by insertion order: reads use `peek` so they never refresh an
//! entry's position, and the oldest-inserted key is dropped on overflow.
//! Staleness is checked separately on read against the configured TTL.

use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;

use super::types::MatchingResult;
use crate::types::RawContext;

/// Stable content-derived key for a raw context.
///
/// Object keys serialize in sorted order, so equal contexts hash equally
/// regardless of how they were built.
pub fn cache_key(raw_context: &RawContext) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_context.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone)]
struct CachedResult {
    result: MatchingResult,
    inserted_at: Instant,
}

/// Result of a cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(Box<MatchingResult>),
    Miss,
    /// Entry existed but outlived the TTL; it has been removed
    Expired,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

/// Matching results keyed by [`cache_key`]
#[derive(Debug)]
pub struct ResultCache {
    entries: LruCache<String, CachedResult>,
    ttl: Duration,
    stats: ResultCacheStats,
}

impl ResultCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
            stats: ResultCacheStats::default(),
        }
    }

    /// Look up a fresh result without changing eviction order
    pub fn get(&mut self, key: &str) -> CacheLookup {
        let lookup = match self.entries.peek(key) {
            Some(cached) if cached.inserted_at.elapsed() < self.ttl => {
                CacheLookup::Hit(Box::new(cached.result.clone()))
            }
            Some(_) => CacheLookup::Expired,
            None => CacheLookup::Miss,
        };

        match lookup {
            CacheLookup::Hit(_) => self.stats.hits += 1,
            CacheLookup::Expired => {
                self.entries.pop(key);
                self.stats.misses += 1;
            }
            CacheLookup::Miss => self.stats.misses += 1,
        }
        self.stats.entries = self.entries.len();
        lookup
    }

    /// Store a result, evicting the oldest-inserted entry when full.
    ///
    /// Returns the evicted key, if any. Re-inserting an existing key counts
    /// as a fresh insertion.
    pub fn insert(&mut self, key: String, result: MatchingResult) -> Option<String> {
        let cached = CachedResult {
            result,
            inserted_at: Instant::now(),
        };

        let evicted = if self.entries.contains(&key) {
            self.entries.put(key, cached);
            None
        } else {
            self.entries.push(key, cached).map(|(evicted, _)| evicted)
        };

        if evicted.is_some() {
            self.stats.evictions += 1;
        }
        self.stats.entries = self.entries.len();
        evicted
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Remove every entry, returning how many were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.entries = 0;
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn stats(&self) -> ResultCacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::types::{Decision, DecisionType, ImplementationPlan, RiskAssessment};
    use crate::types::ContextAnalysis;
    use chrono::Utc;
    use serde_json::json;

    fn result(id: &str) -> MatchingResult {
        MatchingResult {
            operation_id: id.to_string(),
            analysis: ContextAnalysis::with_quality(0.9),
            matches: vec![],
            recommendations: vec![],
            decision: Decision {
                decision_type: DecisionType::NoAction,
                confidence: 0.8,
                recommended_patterns: vec![],
                risk_assessment: RiskAssessment::default(),
                implementation_plan: ImplementationPlan::default(),
                reasoning: String::new(),
            },
            processing_time_ms: 1,
            cached: false,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_cache_key_is_stable_and_order_independent() {
        let a = json!({"language": "rust", "files": ["a.rs", "b.rs"]});
        let b = json!({"files": ["a.rs", "b.rs"], "language": "rust"});
        let c = json!({"files": ["b.rs", "a.rs"], "language": "rust"});

        assert_eq!(cache_key(&a), cache_key(&b));
        assert_ne!(cache_key(&a), cache_key(&c));
        assert_eq!(cache_key(&a).len(), 64);
    }

    #[tokio::test]
    async fn test_evicts_first_inserted_despite_reads() {
        let mut cache = ResultCache::new(3, Duration::from_secs(300));
        for key in ["a", "b", "c"] {
            assert_eq!(cache.insert(key.to_string(), result(key)), None);
        }

        // Reading "a" must not protect it from eviction
        assert!(matches!(cache.get("a"), CacheLookup::Hit(_)));

        assert_eq!(cache.insert("d".to_string(), result("d")), Some("a".to_string()));
        assert!(!cache.contains("a"));
        assert!(cache.contains("b") && cache.contains("c") && cache.contains("d"));
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.len(), 3);
    }

    #[tokio::test]
    async fn test_reinsert_counts_as_fresh_insertion() {
        let mut cache = ResultCache::new(2, Duration::from_secs(300));
        cache.insert("a".to_string(), result("a1"));
        cache.insert("b".to_string(), result("b"));
        assert_eq!(cache.insert("a".to_string(), result("a2")), None);

        assert_eq!(cache.insert("c".to_string(), result("c")), Some("b".to_string()));
        match cache.get("a") {
            CacheLookup::Hit(hit) => assert_eq!(hit.operation_id, "a2"),
            other => panic!("expected hit, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry() {
        let mut cache = ResultCache::new(10, Duration::from_secs(300));
        cache.insert("a".to_string(), result("a"));

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(matches!(cache.get("a"), CacheLookup::Hit(_)));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("a"), CacheLookup::Expired);
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), CacheLookup::Miss);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 2));
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut cache = ResultCache::new(0, Duration::from_secs(1));
        assert_eq!(cache.capacity(), 1);
        cache.insert("a".to_string(), result("a"));
        assert_eq!(cache.clear(), 1);
    }
}
