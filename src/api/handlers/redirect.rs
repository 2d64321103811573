//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL and counts the click.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// `{code}` is a single path segment matched after `/health`, so codes with
/// a `/` or equal to `health` are unreachable here; creation rejects them.
///
/// # Errors
///
/// - 404 if the code does not exist, including a record deleted while it
///   was being resolved
/// - 410 if the link has expired
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let original_url = state.short_link_service.resolve(&code).await?;

    Ok(Redirect::temporary(&original_url))
}
