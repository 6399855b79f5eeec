//! HS256 compact-token signing and verification.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::fmt;

use crate::domain::entities::Claims;
use crate::domain::errors::TokenError;

/// Signs [`Claims`] into compact JWS tokens and verifies them back.
///
/// Verification only proves integrity: it returns the embedded claims
/// unchanged and leaves the time-window check to the caller
/// ([`Claims::is_valid_at`]). MAC comparison inside `jsonwebtoken` is
/// constant-time.
pub struct TokenSigner {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    /// Builds a signer over a shared secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            header: Header::new(Algorithm::HS256),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Serializes and signs `claims`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encoding`] if the claims fail to serialize.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Checks the signature of `token` and returns its claims.
    ///
    /// # Errors
    ///
    /// - [`TokenError::InvalidSignature`] if the MAC does not match or the
    ///   header names a different algorithm
    /// - [`TokenError::Malformed`] if the token cannot be parsed
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::Malformed,
            })
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("algorithm", &self.header.alg)
            .field("key", &"[hidden]")
            .finish()
    }
}
