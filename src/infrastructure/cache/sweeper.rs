//! Background task that actively expires refresh-cache entries.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use super::RefreshTokenCache;

/// Periodically purges expired entries from `cache`.
///
/// Reads already treat expired entries as absent; this only reclaims memory
/// held by sessions that were never refreshed. Runs until the runtime shuts
/// down.
pub async fn run_cache_sweeper(cache: Arc<RefreshTokenCache>, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let purged = cache.purge_expired();
        if purged > 0 {
            debug!(purged, remaining = cache.len(), "Swept expired refresh tokens");
        }
    }
}
