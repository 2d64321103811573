//! API route configuration.

use crate::api::handlers::{
    create_short_url_handler, delete_short_url_handler, get_short_url_handler,
    list_short_urls_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Short URL management routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /urls`          - Create a short URL
/// - `GET    /urls`          - List short URLs (paginated)
/// - `GET    /urls/{code}`   - Details for a short code
/// - `DELETE /urls/{id}`     - Delete a short URL by id
///
/// The details and delete endpoints share one path segment; the delete
/// handler parses it as a UUID.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/urls",
            get(list_short_urls_handler).post(create_short_url_handler),
        )
        .route(
            "/urls/{code}",
            get(get_short_url_handler).delete(delete_short_url_handler),
        )
}
