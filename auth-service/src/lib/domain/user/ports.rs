use async_trait::async_trait;

use crate::domain::user::models::AuthResult;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginUserCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::AuthError;

/// Port for authentication operations exposed over RPC.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and sign a token for them.
    ///
    /// # Arguments
    /// * `command` - Validated email, password and name
    ///
    /// # Returns
    /// Password-stripped user and token
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email is already registered
    /// * `DependencyUnavailable` - Store, hashing or signing failed
    async fn register(&self, command: RegisterUserCommand) -> Result<AuthResult, AuthError>;

    /// Check credentials and sign a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `DependencyUnavailable` - Store, hashing or signing failed
    async fn login(&self, command: LoginUserCommand) -> Result<AuthResult, AuthError>;

    /// Validate a token and re-sign its claims as a fresh token.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed, tampered with or expired
    /// * `DependencyUnavailable` - Signing the new token failed
    async fn verify(&self, token: &str) -> Result<AuthResult, AuthError>;
}

/// Persistence operations the auth service needs from the user store.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DependencyUnavailable` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError>;

    /// Persist a new user; the store assigns id and creation time.
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email uniqueness constraint violated
    /// * `DependencyUnavailable` - Store operation failed
    async fn insert(&self, user: NewUser) -> Result<User, AuthError>;
}
