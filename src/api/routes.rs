//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, delete_profile_handler, get_link_handler,
    get_profile_handler, list_links_handler, logout_handler, refresh_handler, signin_handler,
    signup_handler, update_link_handler, update_profile_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Credential endpoints, open to anonymous callers.
///
/// # Endpoints
///
/// - `POST /signup` - Register and open a session
/// - `POST /auth`   - Sign in with email and password
/// - `PUT  /auth`   - Rotate a refresh token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/auth", post(signin_handler).put(refresh_handler))
}

/// Endpoints that require a valid access token.
///
/// # Endpoints
///
/// - `POST   /auth/logout` - Revoke a refresh token
/// - `GET    /profile`     - Current account
/// - `PATCH  /profile`     - Update name, email or password
/// - `DELETE /profile`     - Delete the account and its links
/// - `GET    /links`       - List own links
/// - `POST   /links`       - Create a short link
/// - `GET    /links/{id}`  - Fetch one link
/// - `PATCH  /links/{id}`  - Update a link
/// - `DELETE /links/{id}`  - Delete a link
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout_handler))
        .route(
            "/profile",
            get(get_profile_handler)
                .patch(update_profile_handler)
                .delete(delete_profile_handler),
        )
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
}
