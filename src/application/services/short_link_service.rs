//! Short link creation, resolution and removal.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::generate_code;
use crate::utils::url_validator::validate_url;

/// Namespace for short link entries in the shared cache.
pub const CACHE_KEY_PREFIX: &str = "url:";

/// How long a cached record may be served before it is re-read from the store.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Attempts at finding a free generated code before giving up.
const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Longest custom code the store accepts (`short_code VARCHAR(10)`).
pub const MAX_CUSTOM_CODE_LENGTH: usize = 10;

/// First path segments owned by other routes; a code equal to one of these
/// could never be reached through `GET /{code}`.
pub const RESERVED_CODES: &[&str] = &["health", "api"];

/// Cache key for a short code.
pub fn cache_key(short_code: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, short_code)
}

/// Service owning the consistency contract between the durable store and the cache.
///
/// Reads are cache-aside: the cache is consulted first, the store on a miss,
/// and the cache is repopulated from whatever the store returned. Every write
/// (create, click increment, delete) updates or evicts the cache entry before
/// the call returns.
///
/// The service holds no state of its own and is shared across request tasks
/// behind an `Arc`.
///
/// # Click counting
///
/// A resolution reads the record, increments `click_count` in memory and
/// writes it back. Two concurrent resolutions of the same code can therefore
/// both write `n + 1`, losing one click. URL and expiry correctness do not
/// depend on the counter, so this is accepted.
pub struct ShortLinkService<R: ShortLinkRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    cache_ttl: Duration,
}

impl<R: ShortLinkRepository + ?Sized> ShortLinkService<R> {
    /// Creates a service with the default one hour cache TTL.
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            repository,
            cache,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Overrides the TTL applied to every cache write.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `original_url` - absolute `http`/`https` URL, stored verbatim
    /// - `custom_code` - used as-is when non-blank; otherwise an 8 character code is generated.
    ///   At most 10 characters, without `/`, and not one of [`RESERVED_CODES`]
    /// - `expires_at` - optional instant after which resolution fails with [`AppError::Expired`]
    /// - `created_by_ip` - provenance, stored but never interpreted
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the URL is not an absolute http(s) URL
    /// - [`AppError::Validation`] if the custom code is too long or unreachable
    /// - [`AppError::ShortCodeAlreadyExists`] if the custom code is taken, or if
    ///   another writer inserted the same code between the existence check and
    ///   the insert
    /// - [`AppError::CodeGenerationFailed`] if no free code was found in 10 attempts
    pub async fn create_short_link(
        &self,
        original_url: String,
        custom_code: Option<String>,
        expires_at: Option<DateTime<Utc>>,
        created_by_ip: Option<String>,
    ) -> Result<ShortLink, AppError> {
        if let Err(e) = validate_url(&original_url) {
            debug!(url = %original_url, reason = %e, "Rejected URL");
            return Err(AppError::InvalidUrl(original_url));
        }

        let short_code = match custom_code.filter(|c| !c.trim().is_empty()) {
            Some(custom) => {
                check_custom_code(&custom)?;
                if self.repository.exists_by_code(&custom).await? {
                    return Err(AppError::ShortCodeAlreadyExists(custom));
                }
                custom
            }
            None => self.generate_unique_code().await?,
        };

        let link = ShortLink::new(original_url, short_code, expires_at, created_by_ip);

        // The store's unique constraint settles any race the check above missed.
        let created = self.repository.create(link).await?;

        self.cache
            .set_json(&cache_key(&created.short_code), &created, self.cache_ttl)
            .await?;

        info!(short_code = %created.short_code, id = %created.id, "Short link created");
        Ok(created)
    }

    /// Resolves a short code to its original URL, counting the click.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no record has this code
    /// - [`AppError::Expired`] if the record's expiry has passed; the click is not counted
    /// - [`AppError::NotFound`] also when the record was served from cache but
    ///   is gone from the store; the stale entry is evicted
    pub async fn resolve(&self, short_code: &str) -> Result<String, AppError> {
        let key = cache_key(short_code);

        let mut link = match self.cache.get_json::<ShortLink>(&key).await? {
            Some(cached) => {
                debug!(short_code, "Resolved from cache");
                cached
            }
            None => {
                let stored = self
                    .repository
                    .get_by_code(short_code)
                    .await?
                    .ok_or_else(|| AppError::NotFound(short_code.to_string()))?;

                self.cache.set_json(&key, &stored, self.cache_ttl).await?;
                stored
            }
        };

        // Checked on every resolution, so a record cached before its expiry
        // is still rejected afterwards.
        if link.is_expired() {
            return Err(AppError::Expired(short_code.to_string()));
        }

        link.click_count += 1;

        if !self.repository.update(link.clone()).await? {
            // Deleted since it was read; never write it back.
            warn!(short_code, id = %link.id, "Click count update matched no row, evicting");
            self.cache.remove(&key).await?;
            return Err(AppError::NotFound(short_code.to_string()));
        }

        self.cache.set_json(&key, &link, self.cache_ttl).await?;

        Ok(link.original_url)
    }

    /// Looks up a short link without counting a click.
    ///
    /// Expired links are returned as-is; `Ok(None)` means no record exists.
    pub async fn get_details(&self, short_code: &str) -> Result<Option<ShortLink>, AppError> {
        let key = cache_key(short_code);

        if let Some(cached) = self.cache.get_json::<ShortLink>(&key).await? {
            return Ok(Some(cached));
        }

        let stored = self.repository.get_by_code(short_code).await?;

        if let Some(link) = &stored {
            self.cache.set_json(&key, link, self.cache_ttl).await?;
        }

        Ok(stored)
    }

    /// Deletes a short link by id.
    ///
    /// The cache entry is evicted before the durable delete. If the delete
    /// then fails, the entry stays evicted and the next read repopulates it
    /// from the store.
    ///
    /// Returns `Ok(false)` if no record has this id.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let Some(link) = self.repository.get_by_id(id).await? else {
            return Ok(false);
        };

        self.cache.remove(&cache_key(&link.short_code)).await?;

        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!(short_code = %link.short_code, %id, "Short link deleted");
        }

        Ok(deleted)
    }

    /// Lists short links newest first. Listings are never cached.
    pub async fn list_all(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<ShortLink>, AppError> {
        self.repository.list_paged(page_number, page_size).await
    }

    /// Reports whether the durable store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.repository.health_check().await
    }

    pub async fn cache_healthy(&self) -> bool {
        self.cache.health_check().await
    }

    /// Generates a code not yet present in the store.
    ///
    /// Attempts up to 10 times before failing.
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let code = generate_code();

            if !self.repository.exists_by_code(&code).await? {
                return Ok(code);
            }

            debug!(code = %code, "Generated code collided, retrying");
        }

        Err(AppError::CodeGenerationFailed {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }
}

/// Rejects custom codes the store or the redirect route cannot handle.
fn check_custom_code(code: &str) -> Result<(), AppError> {
    if code.chars().count() > MAX_CUSTOM_CODE_LENGTH {
        return Err(AppError::bad_request(
            format!("Custom short code must be at most {MAX_CUSTOM_CODE_LENGTH} characters"),
            serde_json::json!({ "customShortCode": code }),
        ));
    }

    if code.contains('/') || RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "Custom short code is not reachable as a redirect path",
            serde_json::json!({ "customShortCode": code }),
        ));
    }

    Ok(())
}
