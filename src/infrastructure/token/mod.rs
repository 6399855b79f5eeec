//! Compact signed tokens.

mod signer;

pub use signer::TokenSigner;
