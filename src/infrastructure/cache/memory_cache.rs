//! In-process cache backed by Moka.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Applies each entry's own TTL on insert and again on overwrite.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Concurrent in-memory cache with per-entry expiration.
///
/// Suitable for single-node deployments, local development and tests. Entries
/// past their TTL are never returned, even before Moka physically evicts them.
#[derive(Clone)]
pub struct MemoryCache {
    cache: Cache<String, Entry>,
}

impl MemoryCache {
    /// Creates a cache holding at most 10,000 entries.
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Creates a cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let value = self.cache.get(key).await.map(|e| e.value);

        match &value {
            Some(_) => debug!(key, "Cache HIT"),
            None => debug!(key, "Cache MISS"),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        self.cache.insert(key.to_string(), Entry { value, ttl }).await;
        debug!(key, ttl_seconds = ttl.as_secs(), "Cache SET");
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<()> {
        self.cache.invalidate(key).await;
        debug!(key, "Cache INVALIDATE");
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.cache.contains_key(key))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache.set("url:abc", "one".to_string(), HOUR).await.unwrap();

        assert_eq!(cache.get("url:abc").await.unwrap().as_deref(), Some("one"));
        assert!(cache.exists("url:abc").await.unwrap());
    }

    #[tokio::test]
    async fn test_miss() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("url:none").await.unwrap(), None);
        assert!(!cache.exists("url:none").await.unwrap());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = MemoryCache::new();
        cache.set("k", "one".to_string(), HOUR).await.unwrap();
        cache.set("k", "two".to_string(), HOUR).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_remove() {
        let cache = MemoryCache::new();
        cache.set("k", "one".to_string(), HOUR).await.unwrap();
        cache.remove("k").await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), None);
        // removing twice is fine
        cache.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set("k", "short".to_string(), Duration::from_millis(50))
            .await
            .unwrap();
        cache.set("other", "long".to_string(), HOUR).await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.get("other").await.unwrap().as_deref(), Some("long"));
    }
}
