//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse, UpdateLinkRequest};
use crate::api::middleware::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL for the caller.
///
/// # Endpoint
///
/// `POST /links`
///
/// # Request Body
///
/// ```json
/// { "full_version": "https://example.com/page", "description": "optional" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is not an absolute http(s) URL.
pub async fn create_link_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create(user.subject_id(), &payload.full_version, payload.description)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, &state.base_url)),
    ))
}

/// `GET /links` - the caller's links, newest first.
pub async fn list_links_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list(user.subject_id()).await?;

    Ok(Json(
        links
            .into_iter()
            .map(|link| LinkResponse::from_link(link, &state.base_url))
            .collect(),
    ))
}

/// `GET /links/{id}`
///
/// Links owned by other users answer 404.
pub async fn get_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get(user.subject_id(), id).await?;
    Ok(Json(LinkResponse::from_link(link, &state.base_url)))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /links/{id}`
///
/// # Request Body
///
/// All fields are optional. Only provided fields are changed.
///
/// ```json
/// { "full_version": "https://new-destination.com", "description": null }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the caller has no such link.
/// Returns 400 Bad Request if validation fails or nothing would change.
pub async fn update_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;
    if payload.description_too_long() {
        return Err(AppError::bad_request(
            "Description is too long",
            json!({ "max_length": 500 }),
        ));
    }

    let link = state
        .link_service
        .update(user.subject_id(), id, payload.into())
        .await?;

    Ok(Json(LinkResponse::from_link(link, &state.base_url)))
}

/// `DELETE /links/{id}`
pub async fn delete_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<StatusCode, AppError> {
    state.link_service.delete(user.subject_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
