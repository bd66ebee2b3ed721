use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use super::AuthResponseData;
use super::RpcError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginUserCommand;
use crate::domain::user::models::Password;
use crate::domain::user::ports::AuthServicePort;
use crate::user::errors::AuthError;
use crate::user::errors::EmailError;
use crate::user::errors::PasswordError;

/// Log a user in.
///
/// Unknown email and wrong password share one message unless
/// `reveal_credential_field` is set, in which case the failing field is named.
pub async fn login<S: AuthServicePort>(
    service: &S,
    body: LoginRequest,
    reveal_credential_field: bool,
) -> Result<AuthResponseData, RpcError> {
    let result = service
        .login(body.try_into_command()?)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials(field) => {
                tracing::debug!(field = %field, "Login rejected");
                if reveal_credential_field {
                    RpcError::BadRequest(format!("Invalid credentials ({})", field))
                } else {
                    RpcError::from(e)
                }
            }
            _ => RpcError::from(e),
        })?;

    Ok(result.into())
}

/// Request data for `auth.login.user` (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Error)]
enum ParseLoginRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordError),
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginUserCommand, ParseLoginRequestError> {
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        Ok(LoginUserCommand::new(email, password))
    }
}

impl From<ParseLoginRequestError> for RpcError {
    fn from(err: ParseLoginRequestError) -> Self {
        RpcError::BadRequest(err.to_string())
    }
}
