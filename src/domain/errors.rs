//! Failure taxonomy of the token subsystem.
//!
//! These kinds are diagnostics only. At the HTTP boundary every one of them
//! collapses into the same `401 Unauthorized` (see [`crate::error::AppError`]).

/// Why a token could not be issued or accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Token structure could not be parsed (corrupt or truncated input).
    #[error("malformed token")]
    Malformed,

    /// MAC check failed: forged token or a different signing key.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The claims' expiry has passed.
    #[error("token expired")]
    Expired,

    /// Signature and expiry are fine but no live cache entry exists:
    /// already rotated, evicted, or never issued.
    #[error("refresh token is no longer valid")]
    RefreshTokenInvalid,

    /// A refresh token was presented where an access token was expected,
    /// or the other way around.
    #[error("unexpected token kind")]
    WrongTokenKind,

    /// Claims could not be serialized for signing.
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

impl TokenError {
    /// Stable label used in logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::RefreshTokenInvalid => "refresh_token_invalid",
            Self::WrongTokenKind => "wrong_token_kind",
            Self::Encoding(_) => "encoding",
        }
    }
}
