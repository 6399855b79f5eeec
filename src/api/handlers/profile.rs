//! Handlers for the caller's own account.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::profile::{ProfileResponse, UpdateProfileRequest};
use crate::api::middleware::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /profile`
pub async fn get_profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let account = state.user_service.get(user.subject_id()).await?;
    Ok(Json(account.into()))
}

/// Updates name, email and/or password.
///
/// # Endpoint
///
/// `PATCH /profile`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "New Name",
///   "email": "new@example.com",
///   "old_password": "current",
///   "new_password": "replacement"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if nothing would change or a password rule fails.
/// Returns 409 Conflict if the new email is taken.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state
        .user_service
        .update_profile(user.subject_id(), payload.into())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes the account and all of its links.
///
/// # Endpoint
///
/// `DELETE /profile`
///
/// Every refresh token of the account is revoked. Outstanding access tokens
/// stay verifiable until they expire but no longer resolve to an account.
pub async fn delete_profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<StatusCode, AppError> {
    state.user_service.delete(user.subject_id()).await?;
    state.token_service.revoke_subject(user.subject_id());
    Ok(StatusCode::NO_CONTENT)
}
