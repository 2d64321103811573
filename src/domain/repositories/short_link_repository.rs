//! Repository trait for short link data access.

use crate::domain::entities::ShortLink;
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Durable store for short links.
///
/// The store is the final arbiter of short-code uniqueness: a concurrent
/// insert that loses the race must fail with
/// [`AppError::ShortCodeAlreadyExists`], regardless of any existence check the
/// caller performed beforehand.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryShortLinkRepository`] - in-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on store errors.
    async fn get_by_code(&self, short_code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] on store errors.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError>;

    /// Inserts a new link and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ShortCodeAlreadyExists`] if the short code is taken.
    /// Returns [`AppError::Database`] on other store errors.
    async fn create(&self, link: ShortLink) -> Result<ShortLink, AppError>;

    /// Overwrites a stored link. Returns `Ok(true)` iff a row was modified.
    async fn update(&self, link: ShortLink) -> Result<bool, AppError>;

    /// Removes a link. Returns `Ok(true)` iff a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn exists_by_code(&self, short_code: &str) -> Result<bool, AppError>;

    /// Lists links newest first.
    ///
    /// # Arguments
    ///
    /// - `page_number` - Page number (1-indexed)
    /// - `page_size` - Number of items per page
    async fn list_paged(&self, page_number: u32, page_size: u32)
    -> Result<Vec<ShortLink>, AppError>;

    /// Checks that the store is reachable.
    async fn health_check(&self) -> bool;
}
