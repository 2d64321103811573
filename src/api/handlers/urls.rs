//! Handlers for the short URL management endpoints.

use axum::{
    Json,
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::short_link::{CreateShortUrlRequest, ShortUrlResponse};
use crate::domain::entities::ShortLink;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::short_url::{join_short_url, short_url_base};

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "originalUrl": "https://example.com/some/long/path",
///   "customShortCode": "promo",          // optional
///   "expiresAt": "2030-01-01T00:00:00Z"  // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created` with a `Location` header pointing at the details endpoint:
///
/// ```json
/// {
///   "id": "6f1c...",
///   "shortCode": "promo",
///   "originalUrl": "https://example.com/some/long/path",
///   "shortUrl": "https://s.example.com/promo",
///   "createdAt": "2026-01-01T12:00:00Z",
///   "expiresAt": "2030-01-01T00:00:00Z",
///   "clickCount": 0
/// }
/// ```
///
/// # Errors
///
/// - 400 if the body fails validation or the URL is not absolute http(s)
/// - 400 if the custom code contains `/` or equals a route segment
///   (`health`, `api`), since `GET /{code}` could never reach it
/// - 409 if the custom short code is taken
pub async fn create_short_url_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<CreateShortUrlRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let base = short_url_base(state.base_url.as_deref(), &headers)?;

    let link = state
        .short_link_service
        .create_short_link(
            payload.original_url,
            payload.custom_short_code,
            payload.expires_at,
            Some(addr.ip().to_string()),
        )
        .await?;

    let location = format!("/api/urls/{}", link.short_code);
    let response = to_response(&base, link);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(response),
    ))
}

/// Lists short URLs, newest first.
///
/// # Endpoint
///
/// `GET /api/urls?pageNumber=1&pageSize=10`
///
/// # Errors
///
/// Returns 400 if `pageNumber` is 0 or `pageSize` is outside `1..=100`.
pub async fn list_short_urls_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<ShortUrlResponse>>, AppError> {
    let (page_number, page_size) = params.resolve()?;
    let base = short_url_base(state.base_url.as_deref(), &headers)?;

    let links = state
        .short_link_service
        .list_all(page_number, page_size)
        .await?;

    Ok(Json(
        links
            .into_iter()
            .map(|link| to_response(&base, link))
            .collect(),
    ))
}

/// Returns details for a short code without counting a click.
///
/// # Endpoint
///
/// `GET /api/urls/{code}`
///
/// Expired links are still returned here; only the redirect rejects them.
pub async fn get_short_url_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ShortUrlResponse>, AppError> {
    let base = short_url_base(state.base_url.as_deref(), &headers)?;

    let link = state
        .short_link_service
        .get_details(&code)
        .await?
        .ok_or(AppError::NotFound(code))?;

    Ok(Json(to_response(&base, link)))
}

/// Deletes a short URL by id.
///
/// # Endpoint
///
/// `DELETE /api/urls/{id}`
///
/// # Errors
///
/// - 400 if `id` is not a UUID
/// - 404 if no link has this id
pub async fn delete_short_url_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let uuid = Uuid::parse_str(&id).map_err(|_| {
        AppError::bad_request("Link id must be a UUID", serde_json::json!({ "id": id }))
    })?;

    if state.short_link_service.delete(uuid).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(id))
    }
}

fn to_response(base: &str, link: ShortLink) -> ShortUrlResponse {
    let short_url = join_short_url(base, &link.short_code);
    ShortUrlResponse::from_link(link, short_url)
}
