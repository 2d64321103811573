//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::ShortLinkService;
use crate::domain::repositories::ShortLinkRepository;
use crate::infrastructure::cache::CacheService;

/// State shared by all request handlers.
///
/// Cloning is cheap: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub short_link_service: Arc<ShortLinkService<dyn ShortLinkRepository>>,
    pub cache: Arc<dyn CacheService>,
    /// Public base for short URLs; `None` derives it from the `Host` header.
    pub base_url: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn ShortLinkRepository>,
        cache: Arc<dyn CacheService>,
        cache_ttl: Duration,
        base_url: Option<String>,
    ) -> Self {
        let short_link_service =
            ShortLinkService::new(repository, cache.clone()).with_cache_ttl(cache_ttl);

        Self {
            short_link_service: Arc::new(short_link_service),
            cache,
            base_url: base_url.map(Arc::from),
        }
    }
}
