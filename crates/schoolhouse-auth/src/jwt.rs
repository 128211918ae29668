//! Token issuing and verification.
//!
//! [`TokenService`] is built once from [`JwtConfig`] and stored in the
//! application state. Construction fails when the signing key is empty, so a
//! running service always signs with the configured key.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use schoolhouse_config::JwtConfig;
use schoolhouse_core::AppError;

use crate::claims::Claims;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("no token signing key configured")]
    MissingSigningKey,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: i64,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Result<Self, TokenError> {
        if config.secret.trim().is_empty() {
            return Err(TokenError::MissingSigningKey);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token one second past `exp` is rejected.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            token_expiry: config.token_expiry,
        })
    }

    /// Validity window of issued tokens, in seconds.
    pub fn token_expiry(&self) -> i64 {
        self.token_expiry
    }

    /// Issues a token for `user_id`, valid from now until now + expiry.
    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    /// Issues a token as if the current time were `issued_at` (Unix seconds).
    pub fn issue_at(&self, user_id: Uuid, issued_at: i64) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.max(0) as usize,
            exp: (issued_at + self.token_expiry).max(0) as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
    }

    /// Verifies the signature and expiry and returns the subject identity ID.
    ///
    /// Every failure (malformed, bad signature, expired, non-UUID subject)
    /// collapses into the same unauthorized error.
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::unauthorized("Invalid token"))?;

        Uuid::parse_str(&claims.sub).map_err(|_| AppError::unauthorized("Invalid token"))
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("token_expiry", &self.token_expiry)
            .finish_non_exhaustive()
    }
}
