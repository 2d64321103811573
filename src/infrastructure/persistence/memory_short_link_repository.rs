//! In-memory implementation of the short link repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct Store {
    links: HashMap<Uuid, ShortLink>,
    codes: HashMap<String, Uuid>,
}

/// Process-local short link store.
///
/// Both indexes sit behind one lock, so the uniqueness check and the insert
/// in [`ShortLinkRepository::create`] are atomic, the same guarantee a unique
/// index gives in PostgreSQL.
#[derive(Default)]
pub struct InMemoryShortLinkRepository {
    store: RwLock<Store>,
}

impl InMemoryShortLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub async fn len(&self) -> usize {
        self.store.read().await.links.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ShortLinkRepository for InMemoryShortLinkRepository {
    async fn get_by_code(&self, short_code: &str) -> Result<Option<ShortLink>, AppError> {
        let store = self.store.read().await;
        Ok(store
            .codes
            .get(short_code)
            .and_then(|id| store.links.get(id))
            .cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError> {
        Ok(self.store.read().await.links.get(&id).cloned())
    }

    async fn create(&self, link: ShortLink) -> Result<ShortLink, AppError> {
        let mut store = self.store.write().await;

        if store.codes.contains_key(&link.short_code) {
            return Err(AppError::ShortCodeAlreadyExists(link.short_code));
        }

        store.codes.insert(link.short_code.clone(), link.id);
        store.links.insert(link.id, link.clone());
        Ok(link)
    }

    async fn update(&self, link: ShortLink) -> Result<bool, AppError> {
        let mut store = self.store.write().await;

        match store.links.get_mut(&link.id) {
            Some(stored) => {
                stored.click_count = link.click_count;
                stored.expires_at = link.expires_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut store = self.store.write().await;

        match store.links.remove(&id) {
            Some(link) => {
                store.codes.remove(&link.short_code);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists_by_code(&self, short_code: &str) -> Result<bool, AppError> {
        Ok(self.store.read().await.codes.contains_key(short_code))
    }

    async fn list_paged(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<ShortLink>, AppError> {
        let store = self.store.read().await;
        let skip = page_number.saturating_sub(1) as usize * page_size as usize;

        let mut links: Vec<ShortLink> = store.links.values().cloned().collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(links
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
