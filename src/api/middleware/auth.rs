//! Bearer access-token authentication.
//!
//! [`layer`] guards protected routes; handlers read the verified subject
//! through the [`AuthenticatedUser`] extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use tracing::debug;

use crate::{error::AppError, state::AppState};

/// Subject id of the verified access token on the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn subject_id(&self) -> &str {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(AppError::invalid_credentials)
    }
}

/// Authenticates requests using access tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <access token>
/// ```
///
/// Verification is stateless: signature, expiry and token kind only. The
/// subject is attached to the request as [`AuthenticatedUser`].
///
/// # Errors
///
/// Returns `401 Unauthorized` with one fixed body whether the header is
/// missing, malformed, forged, expired, or carries a refresh token.
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/profile", get(get_profile_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            debug!("Missing or malformed Authorization header");
            AppError::invalid_credentials()
        })?;

    let subject_id = st.token_service.verify_access_token(&token)?;
    parts.extensions.insert(AuthenticatedUser(subject_id));

    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}
