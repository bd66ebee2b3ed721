use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT handling.
///
/// Tokens carry a caller-defined payload plus `iat`/`exp`. Every token issued
/// here lives for the same configured lifetime.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_ttl` - Lifetime of every issued token
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password and issue a token for `payload`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `payload` - Attributes to embed in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be checked
    /// * `JwtError` - Token generation failed
    pub fn authenticate<T: Serialize>(
        &self,
        password: &str,
        stored_hash: &str,
        payload: &T,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(payload)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Spend one Argon2 computation on `password` and discard the result.
    ///
    /// Call when no account matches, so a miss costs as much as a wrong
    /// password and response time does not reveal which accounts exist.
    pub fn reject_unknown_account(&self, password: &str) {
        let _ = self.password_hasher.hash(password);
    }

    /// Issue a token for `payload` without any credential check.
    ///
    /// # Errors
    /// * `InvalidPayload` - Payload is not a JSON object
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token<T: Serialize>(&self, payload: &T) -> Result<String, JwtError> {
        let claims = Claims::for_payload(payload, self.token_ttl)?;
        self.jwt_handler.encode(&claims)
    }

    /// Validate a token and return its payload without registered claims.
    ///
    /// # Errors
    /// * `TokenExpired`, `InvalidToken`, `DecodingFailed` - Token rejected
    /// * `InvalidPayload` - Payload does not match `T`
    pub fn validate_token<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;
        claims.into_payload()
    }

    /// Validate a token and re-sign its payload with a fresh lifetime.
    ///
    /// # Returns
    /// The decoded payload and the newly issued token
    ///
    /// # Errors
    /// Same as [`Authenticator::validate_token`] and [`Authenticator::issue_token`]
    pub fn refresh_token<T>(&self, token: &str) -> Result<(T, String), JwtError>
    where
        T: Serialize + DeserializeOwned,
    {
        let payload: T = self.validate_token(token)?;
        let refreshed = self.issue_token(&payload)?;
        Ok((payload, refreshed))
    }
}
