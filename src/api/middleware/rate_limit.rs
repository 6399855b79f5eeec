//! Per-client rate limiting for the credential endpoints.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Sustained requests per second per client.
const PER_SECOND: u64 = 1;
/// Requests a client may burst before being throttled.
const BURST_SIZE: u32 = 10;

/// Throttles `router` per client IP.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// When `behind_proxy` is true the client IP is read from `X-Forwarded-For`,
/// `X-Real-IP` or `Forwarded`, falling back to the socket peer. Otherwise
/// only the socket peer address is used, so the server must be started with
/// connect info.
///
/// # Example
///
/// ```rust,ignore
/// let credentials = rate_limit::apply(api::routes::public_routes(), config.behind_proxy);
/// ```
pub fn apply(router: Router<AppState>, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        router.layer(proxy_layer())
    } else {
        router.layer(peer_layer())
    }
}

fn peer_layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(PER_SECOND)
        .burst_size(BURST_SIZE)
        .finish()
        .expect("rate limit constants are non-zero");

    GovernorLayer::new(Arc::new(governor_conf))
}

fn proxy_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(PER_SECOND)
        .burst_size(BURST_SIZE)
        .finish()
        .expect("rate limit constants are non-zero");

    GovernorLayer::new(Arc::new(governor_conf))
}
