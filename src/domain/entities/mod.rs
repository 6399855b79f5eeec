//! Core domain entities.
//!
//! - [`Claims`] / [`TokenKind`] - signed token payload
//! - [`User`] - a registered account, the subject of issued tokens
//! - [`Link`] - a shortened URL owned by a user
//!
//! Creation inputs (`NewUser`, `NewLink`) and partial updates (`UserPatch`,
//! `LinkPatch`) are separate structs.

pub mod claims;
pub mod link;
pub mod user;

pub use claims::{Claims, TokenKind};
pub use link::{Link, LinkPatch, NewLink};
pub use user::{NewUser, User, UserPatch};
