//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /s/{short}`
///
/// The click counter is incremented in the same statement that looks the
/// target up, so concurrent redirects never lose a click.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(short): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let target = state.link_service.resolve(&short).await?;
    Ok(Redirect::temporary(&target))
}

/// `GET /` sends visitors to their link list with a `301 Moved Permanently`.
pub async fn root_handler() -> impl IntoResponse {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "/links")])
}
