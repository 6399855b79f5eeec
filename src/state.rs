//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, TokenService, UserService};
use crate::domain::repositories::{LinkRepository, UserRepository};

/// Services behind trait-object repositories, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<TokenService>,
    pub user_service: Arc<UserService<dyn UserRepository>>,
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    /// Public prefix for short URLs, without a trailing slash.
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        token_service: Arc<TokenService>,
        user_repository: Arc<dyn UserRepository>,
        link_repository: Arc<dyn LinkRepository>,
        base_url: &str,
    ) -> Self {
        Self {
            token_service,
            user_service: Arc::new(UserService::new(user_repository)),
            link_service: Arc::new(LinkService::new(link_repository)),
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }
}
