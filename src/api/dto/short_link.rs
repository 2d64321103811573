//! DTOs for the short URL endpoints.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::ShortLink;

/// Request to create a short URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortUrlRequest {
    /// The URL to shorten. Scheme and host are checked by the service.
    #[validate(length(min = 1, max = 2048))]
    pub original_url: String,

    /// Optional custom short code. Blank means "generate one".
    #[validate(length(max = 10))]
    pub custom_short_code: Option<String>,

    /// Optional expiry; resolving after this instant returns 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A short link as returned by the API.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlResponse {
    pub id: Uuid,
    pub short_code: String,
    pub original_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
}

impl ShortUrlResponse {
    pub fn from_link(link: ShortLink, short_url: String) -> Self {
        Self {
            id: link.id,
            short_code: link.short_code,
            original_url: link.original_url,
            short_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
            click_count: link.click_count,
        }
    }
}
