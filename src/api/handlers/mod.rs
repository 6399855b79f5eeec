//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod links;
pub mod profile;
pub mod redirect;

pub use auth::{logout_handler, refresh_handler, signin_handler, signup_handler};
pub use health::health_handler;
pub use links::{
    create_link_handler, delete_link_handler, get_link_handler, list_links_handler,
    update_link_handler,
};
pub use profile::{delete_profile_handler, get_profile_handler, update_profile_handler};
pub use redirect::{redirect_handler, root_handler};
