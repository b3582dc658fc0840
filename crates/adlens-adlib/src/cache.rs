//! Advertiser analysis cache.
//!
//! Keys are advertiser names, trimmed and lowercased, so `"Nike"` and
//! `" nike "` share an entry. The pipeline treats the cache as best effort:
//! a failed read is a miss and a failed write is only logged.

use std::num::NonZeroUsize;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::analysis::SharedAnalysis;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Normalizes an advertiser name into a cache key.
#[must_use]
pub fn cache_key(advertiser_name: &str) -> String {
    advertiser_name.trim().to_lowercase()
}

#[async_trait]
pub trait AnalysisCache: Send + Sync {
    async fn get(&self, advertiser_name: &str) -> Result<Option<SharedAnalysis>, CacheError>;

    async fn put(&self, advertiser_name: &str, analysis: SharedAnalysis) -> Result<(), CacheError>;
}

struct Entry {
    analysis: SharedAnalysis,
    stored_at: Instant,
}

/// Bounded in-process cache with least-recently-used eviction and a TTL.
pub struct MemoryAnalysisCache {
    entries: Mutex<LruCache<String, Entry>>,
    ttl: Duration,
}

impl MemoryAnalysisCache {
    /// A zero `capacity` is raised to one.
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl AnalysisCache for MemoryAnalysisCache {
    async fn get(&self, advertiser_name: &str) -> Result<Option<SharedAnalysis>, CacheError> {
        let key = cache_key(advertiser_name);
        let mut entries = self.entries.lock().await;

        match entries.get(&key) {
            None => return Ok(None),
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                return Ok(Some(entry.analysis.clone()));
            }
            Some(_) => {}
        }

        entries.pop(&key);
        tracing::debug!(key = %key, "cache entry expired");
        Ok(None)
    }

    async fn put(&self, advertiser_name: &str, analysis: SharedAnalysis) -> Result<(), CacheError> {
        let key = cache_key(advertiser_name);
        let entry = Entry {
            analysis,
            stored_at: Instant::now(),
        };
        if let Some((evicted, _)) = self.entries.lock().await.push(key, entry) {
            tracing::debug!(key = %evicted, "cache entry replaced or evicted");
        }
        Ok(())
    }
}

/// A cache that stores nothing. Every read is a miss.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

#[async_trait]
impl AnalysisCache for NoCache {
    async fn get(&self, _advertiser_name: &str) -> Result<Option<SharedAnalysis>, CacheError> {
        Ok(None)
    }

    async fn put(&self, _advertiser_name: &str, _analysis: SharedAnalysis) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::analysis::build_analysis;
    use crate::raw::RawAdRecord;

    fn analysis(name: &str) -> SharedAnalysis {
        let record = RawAdRecord::from_value(json!({ "page_name": name }));
        Arc::new(build_analysis(vec![record]).unwrap())
    }

    #[test]
    fn key_is_trimmed_and_lowercased() {
        assert_eq!(cache_key("  Nike Running "), "nike running");
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let cache = MemoryAnalysisCache::new(4, Duration::from_secs(60));
        cache.put("Nike", analysis("Nike")).await.unwrap();

        let hit = cache.get("  NIKE ").await.unwrap().expect("should hit");
        assert_eq!(hit.advertiser.name, "Nike");
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = MemoryAnalysisCache::new(4, Duration::from_secs(60));
        cache.put("nike", analysis("Nike")).await.unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("nike").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("nike").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn least_recently_used_entry_is_evicted() {
        let cache = MemoryAnalysisCache::new(2, Duration::from_secs(60));
        cache.put("a", analysis("A")).await.unwrap();
        cache.put("b", analysis("B")).await.unwrap();
        cache.get("a").await.unwrap();
        cache.put("c", analysis("C")).await.unwrap();

        assert!(cache.get("a").await.unwrap().is_some());
        assert!(cache.get("b").await.unwrap().is_none());
        assert!(cache.get("c").await.unwrap().is_some());
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn no_cache_never_hits() {
        NoCache.put("a", analysis("A")).await.unwrap();
        assert!(NoCache.get("a").await.unwrap().is_none());
    }
}
