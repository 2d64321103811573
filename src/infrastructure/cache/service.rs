//! Cache service trait and error types.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Cache operation error: {0}")]
    Operation(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value cache with per-entry expiration.
///
/// Values are opaque strings; typed access goes through `get_json` and
/// `set_json` on `dyn CacheService`, which encode with `serde_json`. Keys are used verbatim, so callers are responsible for
/// namespacing them.
///
/// Unlike a fail-open cache, implementations report backend failures as
/// [`CacheError`] and leave the policy to the caller.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process cache (moka)
/// - [`crate::infrastructure::cache::NullCache`] - no-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the raw value stored under `key`, or `None` on a miss.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous entry and resetting its TTL.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    /// Removes the entry for `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> CacheResult<()>;

    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}

impl dyn CacheService {
    /// Reads and decodes a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Serialization`] if the stored value does not
    /// decode as `T`, or the backend error from [`CacheService::get`].
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and stores it with the given TTL.
    pub async fn set_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> CacheResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, raw, ttl).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::Arc;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        url: String,
        hits: u32,
    }

    #[tokio::test]
    async fn test_get_json_decodes_value() {
        let mut mock = MockCacheService::new();
        mock.expect_get()
            .withf(|key| key == "k")
            .times(1)
            .returning(|_| Ok(Some(r#"{"url":"https://a.io","hits":3}"#.to_string())));

        let cache: Arc<dyn CacheService> = Arc::new(mock);
        let entry: Option<Entry> = cache.get_json("k").await.unwrap();

        assert_eq!(
            entry,
            Some(Entry {
                url: "https://a.io".to_string(),
                hits: 3
            })
        );
    }

    #[tokio::test]
    async fn test_get_json_rejects_garbage() {
        let mut mock = MockCacheService::new();
        mock.expect_get()
            .returning(|_| Ok(Some("not json".to_string())));

        let cache: Arc<dyn CacheService> = Arc::new(mock);
        let result = cache.get_json::<Entry>("k").await;

        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_set_json_encodes_value() {
        let mut mock = MockCacheService::new();
        mock.expect_set()
            .withf(|key, value, ttl| {
                key == "k"
                    && value == r#"{"url":"https://a.io","hits":1}"#
                    && *ttl == Duration::from_secs(60)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let cache: Arc<dyn CacheService> = Arc::new(mock);
        let entry = Entry {
            url: "https://a.io".to_string(),
            hits: 1,
        };

        cache
            .set_json("k", &entry, Duration::from_secs(60))
            .await
            .unwrap();
    }
}
