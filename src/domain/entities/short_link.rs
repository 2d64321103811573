//! ShortLink entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shortened URL with its click counter.
///
/// This is also the value stored in the cache, so it round-trips through JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShortLink {
    pub id: Uuid,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub created_by_ip: Option<String>,
}

impl ShortLink {
    /// Builds a fresh record with a new id, the current time and zero clicks.
    pub fn new(
        original_url: String,
        short_code: String,
        expires_at: Option<DateTime<Utc>>,
        created_by_ip: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_url,
            short_code,
            created_at: Utc::now(),
            expires_at,
            click_count: 0,
            created_by_ip,
        }
    }

    /// Returns true once `expires_at` is at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link(expires_at: Option<DateTime<Utc>>) -> ShortLink {
        ShortLink::new(
            "https://example.com".to_string(),
            "abcd1234".to_string(),
            expires_at,
            Some("127.0.0.1".to_string()),
        )
    }

    #[test]
    fn test_short_link_creation() {
        let before = Utc::now();
        let link = link(None);

        assert_eq!(link.original_url, "https://example.com");
        assert_eq!(link.short_code, "abcd1234");
        assert_eq!(link.click_count, 0);
        assert_eq!(link.created_by_ip.as_deref(), Some("127.0.0.1"));
        assert!(link.created_at >= before);
        assert!(!link.is_expired());
    }

    #[test]
    fn test_new_links_get_distinct_ids() {
        assert_ne!(link(None).id, link(None).id);
    }

    #[test]
    fn test_short_link_is_expired() {
        let link = link(Some(Utc::now() - Duration::seconds(1)));
        assert!(link.is_expired());
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let link = link(Some(now));
        assert!(link.is_expired_at(now));
        assert!(!link.is_expired_at(now - Duration::milliseconds(1)));
    }

    #[test]
    fn test_future_expiry_is_not_expired() {
        let link = link(Some(Utc::now() + Duration::hours(1)));
        assert!(!link.is_expired());
    }

    #[test]
    fn test_json_round_trip_keeps_all_fields() {
        let mut original = link(Some(Utc::now() + Duration::days(1)));
        original.click_count = 42;

        let json = serde_json::to_string(&original).unwrap();
        let decoded: ShortLink = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, original);
    }
}
