//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 12 users" },
///     "refresh_cache": { "status": "ok", "message": "3/100000 sessions" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let refresh_cache = check_refresh_cache(&state);

    let all_healthy = database.is_ok() && refresh_cache.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            refresh_cache,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks database connectivity with a cheap count query.
async fn check_database(state: &AppState) -> CheckStatus {
    match state.user_service.count().await {
        Ok(users) => CheckStatus::ok(format!("Connected, {users} users")),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

/// Reports refresh-cache occupancy. Always ok; a full cache only evicts.
fn check_refresh_cache(state: &AppState) -> CheckStatus {
    let cache = state.token_service.cache();
    CheckStatus::ok(format!("{}/{} sessions", cache.len(), cache.capacity()))
}
