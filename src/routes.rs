//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`            - Redirect to `/links`
//! - `GET  /health`      - Health check: DB and refresh cache (public)
//! - `GET  /s/{short}`   - Short link redirect (public)
//! - `POST /signup`, `POST /auth`, `PUT /auth` - Credentials (public, rate limited)
//! - `/auth/logout`, `/profile`, `/links/*` - Access token required
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on credential endpoints
//! - **Authentication** - Bearer access token on protected routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, root_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the production router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let credentials = rate_limit::apply(api::routes::public_routes(), behind_proxy);
    NormalizePathLayer::trim_trailing_slash().layer(build(state, credentials))
}

/// The same routes without rate limiting or path normalization.
///
/// Needs no connect info, so it can be driven directly by in-process test
/// clients.
pub fn router(state: AppState) -> Router {
    build(state, api::routes::public_routes())
}

fn build(state: AppState, credentials: Router<AppState>) -> Router {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/s/{short}", get(redirect_handler))
        .merge(credentials)
        .merge(protected)
        .with_state(state)
        .layer(tracing::layer())
}
