//! Signed token payload and its time-validity rule.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Distinguishes short-lived access tokens from rotating refresh tokens.
///
/// Carried inside the signed payload so one kind can never be replayed as
/// the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Payload carried by every token the service signs.
///
/// Timestamps are encoded as nanoseconds since the epoch, so a claims set
/// survives a sign/verify round trip unchanged at full clock precision.
///
/// Invariant: `expires_at > issued_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub subject_id: String,

    #[serde(rename = "iat", with = "chrono::serde::ts_nanoseconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_nanoseconds")]
    pub expires_at: DateTime<Utc>,

    #[serde(rename = "typ")]
    pub kind: TokenKind,

    /// Refresh-token identifier; the refresh-token cache is keyed by it.
    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
}

impl Claims {
    /// Creates access-token claims valid from `now` for `ttl`.
    ///
    /// `ttl` must be positive; configuration validation guarantees it.
    pub fn new(subject_id: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            subject_id: subject_id.into(),
            issued_at: now,
            expires_at: now + ttl,
            kind: TokenKind::Access,
            token_id: None,
        }
    }

    /// Creates refresh-token claims embedding `token_id`.
    pub fn refresh(
        subject_id: impl Into<String>,
        token_id: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            kind: TokenKind::Refresh,
            token_id: Some(token_id.into()),
            ..Self::new(subject_id, now, ttl)
        }
    }

    /// Returns true iff `issued_at <= at < expires_at`.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.issued_at <= at && at < self.expires_at
    }
}
