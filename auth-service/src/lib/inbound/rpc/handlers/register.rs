use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use super::AuthResponseData;
use super::RpcError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UserName;
use crate::domain::user::ports::AuthServicePort;
use crate::user::errors::EmailError;
use crate::user::errors::PasswordError;
use crate::user::errors::UserNameError;

pub async fn register<S: AuthServicePort>(
    service: &S,
    body: RegisterRequest,
) -> Result<AuthResponseData, RpcError> {
    service
        .register(body.try_into_command()?)
        .await
        .map_err(RpcError::from)
        .map(AuthResponseData::from)
}

/// Request data for `auth.register.user` (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordError),

    #[error("Invalid name: {0}")]
    Name(#[from] UserNameError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, ParseRegisterRequestError> {
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        let name = UserName::new(self.name)?;
        Ok(RegisterUserCommand::new(email, password, name))
    }
}

impl From<ParseRegisterRequestError> for RpcError {
    fn from(err: ParseRegisterRequestError) -> Self {
        RpcError::BadRequest(err.to_string())
    }
}
