//! Handlers for session endpoints: signup, signin, refresh and logout.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::auth::{RefreshRequest, SigninRequest, SignupRequest};
use crate::api::middleware::auth::AuthenticatedUser;
use crate::application::services::SessionTokens;
use crate::error::AppError;
use crate::state::AppState;

/// Registers an account and opens a session for it.
///
/// # Endpoint
///
/// `POST /signup`
///
/// # Response
///
/// `201 Created` with `{"token": "...", "refresh_token": "..."}`.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the email is already registered.
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionTokens>), AppError> {
    payload.validate()?;

    let user = state
        .user_service
        .signup(&payload.name, &payload.email, &payload.password)
        .await?;

    let tokens = state.token_service.issue_session_tokens(&user.subject_id())?;

    Ok((StatusCode::CREATED, Json(tokens)))
}

/// Exchanges credentials for a new session.
///
/// # Endpoint
///
/// `POST /auth`
///
/// # Errors
///
/// Returns 401 Unauthorized for an unknown email or a wrong password.
pub async fn signin_handler(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> Result<(StatusCode, Json<SessionTokens>), AppError> {
    payload.validate()?;

    let user = state
        .user_service
        .authenticate(&payload.email, &payload.password)
        .await?;

    let tokens = state.token_service.issue_session_tokens(&user.subject_id())?;

    Ok((StatusCode::CREATED, Json(tokens)))
}

/// Rotates a refresh token.
///
/// # Endpoint
///
/// `PUT /auth`
///
/// # Request Body
///
/// ```json
/// { "refresh_token": "..." }
/// ```
///
/// The presented refresh token is consumed: a second attempt with it fails.
///
/// # Errors
///
/// Returns 401 Unauthorized whenever rotation is refused.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<(StatusCode, Json<SessionTokens>), AppError> {
    payload.validate()?;

    let tokens = state
        .token_service
        .update_refresh_token(&payload.refresh_token)?;

    Ok((StatusCode::CREATED, Json(tokens)))
}

/// Ends a session by revoking its refresh token.
///
/// # Endpoint
///
/// `POST /auth/logout` (access token required)
///
/// Always answers `204 No Content`, whether or not the refresh token was
/// still live.
pub async fn logout_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<RefreshRequest>,
) -> StatusCode {
    state
        .token_service
        .revoke_refresh_token(&payload.refresh_token, user.subject_id());

    StatusCode::NO_CONTENT
}
