//! TTL-bounded search result cache.
//!
//! Every operation fails soft: read problems look like a cache miss and write
//! problems drop the write. Callers never see a cache error.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::key::{CACHE_PREFIX, cache_key, is_fresh};
use super::store::KvStore;
use crate::clock::Clock;
use crate::models::SearchMode;

/// Stored envelope: `{"timestamp": <epoch-millis>, "data": <results>}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub timestamp: i64,
    pub data: T,
}

#[derive(Deserialize)]
struct Stamp {
    timestamp: i64,
}

/// Search results cached per (mode, normalized term) for 24 hours.
#[derive(Debug, Clone)]
pub struct ResultCache {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The underlying store, shared with other persisted client state.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Get cached results for a search.
    ///
    /// Returns None if the entry is missing, unreadable, or expired.
    /// Expired entries are deleted on the way out.
    pub async fn get<T: DeserializeOwned>(&self, mode: SearchMode, term: &str) -> Option<T> {
        let key = cache_key(mode, term);

        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(%key, "error reading cache: {}", e);
                return None;
            }
        };

        let entry: CacheEntry<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(%key, "unreadable cache entry: {}", e);
                return None;
            }
        };

        if !is_fresh(entry.timestamp, self.clock.now_millis()) {
            tracing::debug!(%key, "cache expired");
            if let Err(e) = self.store.remove(&key).await {
                tracing::warn!(%key, "failed to remove expired entry: {}", e);
            }
            return None;
        }

        match serde_json::from_value(entry.data) {
            Ok(data) => {
                tracing::debug!(%key, "using cached results");
                Some(data)
            }
            Err(e) => {
                tracing::debug!(%key, "cached data has unexpected shape: {}", e);
                None
            }
        }
    }

    /// Cache results for a search, overwriting any prior entry.
    ///
    /// If the store is full, expired entries are evicted and the write is
    /// retried once. A write that still fails is dropped.
    pub async fn set<T: Serialize + ?Sized>(&self, mode: SearchMode, term: &str, data: &T) {
        let key = cache_key(mode, term);
        let entry = CacheEntry { timestamp: self.clock.now_millis(), data };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(%key, "failed to encode cache entry: {}", e);
                return;
            }
        };

        match self.store.set(&key, &json).await {
            Ok(()) => tracing::debug!(%key, "cached results"),
            Err(e) if e.is_quota_exceeded() => {
                let evicted = self.evict_expired().await;
                match self.store.set(&key, &json).await {
                    Ok(()) => tracing::debug!(%key, evicted, "cached results after eviction"),
                    Err(e) => tracing::warn!(%key, evicted, "still unable to cache after cleanup: {}", e),
                }
            }
            Err(e) => tracing::warn!(%key, "error saving to cache: {}", e),
        }
    }

    /// Delete every cache entry older than the TTL.
    ///
    /// Entries that cannot be parsed are removed too. Returns the number of
    /// deleted entries.
    pub async fn evict_expired(&self) -> usize {
        let keys = match self.store.keys_with_prefix(CACHE_PREFIX).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("error listing cache keys: {}", e);
                return 0;
            }
        };

        let now = self.clock.now_millis();
        let mut removed = 0;

        for key in keys {
            let expired = match self.store.get(&key).await {
                Ok(Some(raw)) => match serde_json::from_str::<Stamp>(&raw) {
                    Ok(stamp) => !is_fresh(stamp.timestamp, now),
                    Err(_) => true,
                },
                Ok(None) => false,
                Err(e) => {
                    tracing::warn!(%key, "error reading cache: {}", e);
                    false
                }
            };

            if !expired {
                continue;
            }

            match self.store.remove(&key).await {
                Ok(()) => {
                    tracing::debug!(%key, "removed expired cache");
                    removed += 1;
                }
                Err(e) => tracing::warn!(%key, "failed to remove expired entry: {}", e),
            }
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CACHE_TTL_MS, CacheDb, MemoryStore};
    use crate::clock::ManualClock;
    use chrono::TimeDelta;

    const T0: i64 = 1_700_000_000_000;

    fn cache_with(store: Arc<dyn KvStore>) -> (ResultCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        (ResultCache::new(store, clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_set_and_get_normalized_term() {
        let (cache, _) = cache_with(Arc::new(MemoryStore::new()));
        cache.set(SearchMode::Title, "  Calc ", &vec!["a", "b"]).await;

        let hit: Option<Vec<String>> = cache.get(SearchMode::Title, "calc").await;
        assert_eq!(hit, Some(vec!["a".to_string(), "b".to_string()]));

        let other_mode: Option<Vec<String>> = cache.get(SearchMode::Code, "calc").await;
        assert!(other_mode.is_none());
    }

    #[tokio::test]
    async fn test_ttl_edges() {
        let store = Arc::new(MemoryStore::new());
        let (cache, clock) = cache_with(store.clone());
        cache.set(SearchMode::Code, "101", &vec![1, 2, 3]).await;

        clock.advance(TimeDelta::hours(23) + TimeDelta::minutes(59));
        let hit: Option<Vec<i32>> = cache.get(SearchMode::Code, "101").await;
        assert_eq!(hit, Some(vec![1, 2, 3]));

        clock.set(T0 + CACHE_TTL_MS + 1_000);
        let miss: Option<Vec<i32>> = cache.get(SearchMode::Code, "101").await;
        assert!(miss.is_none());
        assert!(store.get("search_cache_code_101").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_results_are_cached() {
        let (cache, _) = cache_with(Arc::new(MemoryStore::new()));
        cache.set(SearchMode::Title, "zzz", &Vec::<String>::new()).await;

        let hit: Option<Vec<String>> = cache.get(SearchMode::Title, "zzz").await;
        assert_eq!(hit, Some(vec![]));
    }

    #[tokio::test]
    async fn test_corrupt_entry_reads_as_miss() {
        let store = Arc::new(MemoryStore::new());
        store.set("search_cache_title_calc", "{not json").await.unwrap();
        store.set("search_cache_title_alg", r#"{"timestamp": 1, "data": "#).await.unwrap();
        let (cache, _) = cache_with(store);

        let miss: Option<Vec<String>> = cache.get(SearchMode::Title, "calc").await;
        assert!(miss.is_none());
        let miss: Option<Vec<String>> = cache.get(SearchMode::Title, "alg").await;
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_wrong_shape_reads_as_miss() {
        let (cache, _) = cache_with(Arc::new(MemoryStore::new()));
        cache.set(SearchMode::Professor, "smith", &serde_json::json!({"message": "x"})).await;

        let miss: Option<Vec<String>> = cache.get(SearchMode::Professor, "smith").await;
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_overwrite_refreshes_timestamp() {
        let (cache, clock) = cache_with(Arc::new(MemoryStore::new()));
        cache.set(SearchMode::Title, "calc", &vec!["old"]).await;
        clock.advance(TimeDelta::hours(20));
        cache.set(SearchMode::Title, "calc", &vec!["new"]).await;
        clock.advance(TimeDelta::hours(20));

        let hit: Option<Vec<String>> = cache.get(SearchMode::Title, "calc").await;
        assert_eq!(hit, Some(vec!["new".to_string()]));
    }

    #[tokio::test]
    async fn test_evict_expired_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let (cache, clock) = cache_with(store.clone());
        cache.set(SearchMode::Title, "old", &vec![1]).await;
        clock.advance(TimeDelta::hours(12));
        cache.set(SearchMode::Title, "new", &vec![2]).await;
        store.set("user_location", r#"{"timestamp": 0}"#).await.unwrap();
        store.set("search_cache_title_broken", "garbage").await.unwrap();
        clock.advance(TimeDelta::hours(13));

        assert_eq!(cache.evict_expired().await, 2);
        assert_eq!(cache.evict_expired().await, 0);

        assert_eq!(store.keys_with_prefix(CACHE_PREFIX).await.unwrap(), vec!["search_cache_title_new".to_string()]);
        assert!(store.get("user_location").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_quota_exceeded_evicts_then_retries() {
        let store = Arc::new(MemoryStore::with_quota(160));
        let (cache, clock) = cache_with(store.clone());
        cache.set(SearchMode::Title, "first", &vec!["aaaaaaaaaaaaaaaaaaaa"]).await;
        clock.advance(TimeDelta::hours(25));

        cache.set(SearchMode::Title, "second", &vec!["bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"]).await;

        assert!(store.get("search_cache_title_first").await.unwrap().is_none());
        let hit: Option<Vec<String>> = cache.get(SearchMode::Title, "second").await;
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn test_quota_exceeded_drops_write_silently() {
        let store = Arc::new(MemoryStore::with_quota(40));
        let (cache, _) = cache_with(store.clone());

        cache.set(SearchMode::Title, "huge", &vec!["x".repeat(100)]).await;

        assert!(store.is_empty().await);
        let miss: Option<Vec<String>> = cache.get(SearchMode::Title, "huge").await;
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_sqlite_backed_cache() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let (cache, clock) = cache_with(Arc::new(db));
        cache.set(SearchMode::Professor, "Smith", &vec!["match"]).await;

        let hit: Option<Vec<String>> = cache.get(SearchMode::Professor, "smith").await;
        assert_eq!(hit, Some(vec!["match".to_string()]));

        clock.advance(TimeDelta::hours(24));
        assert_eq!(cache.evict_expired().await, 1);
    }
}
