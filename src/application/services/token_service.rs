//! Token lifecycle: session issuance, access verification and refresh rotation.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Duration;
use metrics::counter;
use rand::RngCore;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::entities::{Claims, TokenKind};
use crate::domain::errors::TokenError;
use crate::infrastructure::cache::RefreshTokenCache;
use crate::infrastructure::clock::Clock;
use crate::infrastructure::token::TokenSigner;

/// Random bytes behind each refresh-token identifier.
const TOKEN_ID_BYTES: usize = 32;

/// Settings consumed by [`TokenService`], built once from process configuration.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub cache_capacity: usize,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"***")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}

/// An access token together with the refresh token that can replace it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionTokens {
    #[serde(rename = "token")]
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues, verifies and rotates session tokens.
///
/// Access tokens are stateless. Refresh tokens are single-use: each one is
/// registered in the [`RefreshTokenCache`] when minted and removed when
/// exchanged, so a replayed refresh token is rejected even while its
/// signature and expiry still check out.
///
/// Errors carry the precise [`TokenError`] for logging and tests; the HTTP
/// layer collapses all of them into one generic unauthorized response.
pub struct TokenService {
    signer: TokenSigner,
    cache: Arc<RefreshTokenCache>,
    clock: Arc<dyn Clock>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Creates the service. `cache` is owned by this service from here on;
    /// nothing else should write to it.
    pub fn new(settings: &TokenSettings, cache: Arc<RefreshTokenCache>, clock: Arc<dyn Clock>) -> Self {
        Self {
            signer: TokenSigner::new(settings.secret.as_bytes()),
            cache,
            clock,
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
        }
    }

    /// Mints a short-lived access token for `subject_id`.
    pub fn generate_access_token(&self, subject_id: &str) -> Result<String, TokenError> {
        let claims = Claims::new(subject_id, self.clock.now(), self.access_ttl);
        self.signer.sign(&claims)
    }

    /// Mints a fresh access/refresh pair and registers the refresh token.
    ///
    /// Used on signup and signin, and as the second half of rotation.
    pub fn issue_session_tokens(&self, subject_id: &str) -> Result<SessionTokens, TokenError> {
        let token_id = generate_token_id();
        let claims = Claims::refresh(subject_id, &token_id, self.clock.now(), self.refresh_ttl);
        let refresh_token = self.signer.sign(&claims)?;
        let access_token = self.generate_access_token(subject_id)?;

        self.cache
            .put_until(&token_id, subject_id, claims.expires_at);

        counter!("auth_tokens_issued_total").increment(1);
        debug!(subject_id, "Issued session tokens");

        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    /// Exchanges a refresh token for a brand-new pair, burning the old one.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Malformed`] / [`TokenError::InvalidSignature`] if the
    ///   token fails verification
    /// - [`TokenError::WrongTokenKind`] if an access token was presented
    /// - [`TokenError::Expired`] if the refresh token is past its expiry
    /// - [`TokenError::RefreshTokenInvalid`] if it was already used, evicted
    ///   or never issued
    pub fn update_refresh_token(&self, presented: &str) -> Result<SessionTokens, TokenError> {
        let result = self.rotate(presented);

        match &result {
            Ok(_) => {
                counter!("auth_refresh_rotations_total").increment(1);
            }
            Err(e) => self.record_rejection("refresh", e),
        }

        result
    }

    fn rotate(&self, presented: &str) -> Result<SessionTokens, TokenError> {
        let claims = self.verify_kind(presented, TokenKind::Refresh)?;
        let token_id = claims.token_id.as_deref().ok_or(TokenError::Malformed)?;

        let owner = self
            .cache
            .take(token_id)
            .ok_or(TokenError::RefreshTokenInvalid)?;

        if owner != claims.subject_id {
            warn!(
                subject_id = %claims.subject_id,
                "Refresh token registered to a different subject"
            );
            return Err(TokenError::RefreshTokenInvalid);
        }

        info!(subject_id = %owner, "Rotated refresh token");
        self.issue_session_tokens(&owner)
    }

    /// Verifies an access token and returns the subject it was issued to.
    ///
    /// Stateless: never touches the refresh-token cache.
    pub fn verify_access_token(&self, presented: &str) -> Result<String, TokenError> {
        self.verify_kind(presented, TokenKind::Access)
            .map(|claims| claims.subject_id)
            .inspect_err(|e| self.record_rejection("access", e))
    }

    /// Invalidates a refresh token on logout.
    ///
    /// Only the token's own subject may revoke it. Returns whether a live
    /// entry was removed.
    pub fn revoke_refresh_token(&self, presented: &str, subject_id: &str) -> bool {
        let Ok(claims) = self.signer.verify(presented) else {
            return false;
        };
        if claims.kind != TokenKind::Refresh || claims.subject_id != subject_id {
            return false;
        }

        let removed = claims
            .token_id
            .as_deref()
            .is_some_and(|id| self.cache.invalidate(id));

        if removed {
            info!(subject_id, "Refresh token revoked");
        }
        removed
    }

    /// Ends every session of `subject_id`, e.g. when the account is deleted.
    ///
    /// Access tokens already handed out stay verifiable until they expire.
    pub fn revoke_subject(&self, subject_id: &str) -> usize {
        let revoked = self.cache.invalidate_subject(subject_id);
        if revoked > 0 {
            info!(subject_id, revoked, "Refresh tokens revoked for subject");
        }
        revoked
    }

    /// The refresh-token cache backing this service, for introspection.
    pub fn cache(&self) -> &RefreshTokenCache {
        &self.cache
    }

    fn verify_kind(&self, presented: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let claims = self.signer.verify(presented)?;

        if claims.kind != expected {
            return Err(TokenError::WrongTokenKind);
        }
        if !claims.is_valid_at(self.clock.now()) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn record_rejection(&self, token: &'static str, error: &TokenError) {
        counter!("auth_token_rejections_total", "token" => token, "reason" => error.reason())
            .increment(1);
        debug!(token, reason = error.reason(), "Token rejected");
    }
}

/// Random, URL-safe refresh-token identifier.
fn generate_token_id() -> String {
    let mut bytes = [0u8; TOKEN_ID_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
