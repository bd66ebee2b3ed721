use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::JwtError;

use crate::domain::user::models::AuthResult;
use crate::domain::user::models::LoginUserCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UserClaims;
use crate::user::errors::AuthError;
use crate::user::errors::CredentialField;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for authentication.
///
/// Stateless: every call is an independent request against the injected
/// repository and authenticator.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User store implementation
    /// * `authenticator` - Password hashing and token signing
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    fn sign(&self, user: UserClaims) -> Result<AuthResult, AuthError> {
        let token = self
            .authenticator
            .issue_token(&user)
            .map_err(|e| AuthError::DependencyUnavailable(format!("Token signing failed: {}", e)))?;

        Ok(AuthResult { user, token })
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<AuthResult, AuthError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(AuthError::UserAlreadyExists(command.email.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())
            .map_err(|e| AuthError::DependencyUnavailable(e.to_string()))?;

        let user = self
            .repository
            .insert(NewUser {
                email: command.email,
                name: command.name,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        self.sign(UserClaims::from(&user))
    }

    async fn login(&self, command: LoginUserCommand) -> Result<AuthResult, AuthError> {
        let Some(user) = self.repository.find_by_email(&command.email).await? else {
            self.authenticator.reject_unknown_account(command.password.expose());
            return Err(AuthError::InvalidCredentials(CredentialField::Email));
        };

        let claims = UserClaims::from(&user);

        let result = self
            .authenticator
            .authenticate(command.password.expose(), &user.password_hash, &claims)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    AuthError::InvalidCredentials(CredentialField::Password)
                }
                other => AuthError::DependencyUnavailable(other.to_string()),
            })?;

        tracing::debug!(user_id = %user.id, "User logged in");

        Ok(AuthResult {
            user: claims,
            token: result.access_token,
        })
    }

    async fn verify(&self, token: &str) -> Result<AuthResult, AuthError> {
        let (user, token) = self
            .authenticator
            .refresh_token::<UserClaims>(token)
            .map_err(|e| match e {
                JwtError::EncodingFailed(_) => AuthError::DependencyUnavailable(e.to_string()),
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        Ok(AuthResult { user, token })
    }
}
