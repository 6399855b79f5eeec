//! In-process refresh-token cache.
//!
//! - [`RefreshTokenCache`] - bounded LRU map with per-entry expiry
//! - [`run_cache_sweeper`] - background task reclaiming expired entries

mod refresh_token_cache;
mod sweeper;

pub use refresh_token_cache::RefreshTokenCache;
pub use sweeper::run_cache_sweeper;
