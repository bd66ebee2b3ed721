use serde::Deserialize;
use serde::Serialize;

use super::messages::RpcErrorBody;
use crate::domain::user::models::AuthResult;
use crate::domain::user::models::UserClaims;
use crate::user::errors::AuthError;

pub mod login;
pub mod register;
pub mod verify_token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    BadRequest(String),
    Unauthorized(String),
    InternalServerError(String),
}

impl RpcError {
    pub fn status(&self) -> u16 {
        match self {
            RpcError::BadRequest(_) => 400,
            RpcError::Unauthorized(_) => 401,
            RpcError::InternalServerError(_) => 500,
        }
    }
}

impl From<RpcError> for RpcErrorBody {
    fn from(err: RpcError) -> Self {
        let status = err.status();
        let message = match err {
            RpcError::BadRequest(msg)
            | RpcError::Unauthorized(msg)
            | RpcError::InternalServerError(msg) => msg,
        };

        RpcErrorBody { status, message }
    }
}

impl From<AuthError> for RpcError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail(_)
            | AuthError::InvalidName(_)
            | AuthError::InvalidPassword(_) => RpcError::BadRequest(err.to_string()),
            AuthError::UserAlreadyExists(_) => {
                RpcError::BadRequest("User already exists".to_string())
            }
            AuthError::InvalidCredentials(_) => {
                RpcError::BadRequest("Invalid credentials".to_string())
            }
            AuthError::InvalidToken(message) => RpcError::Unauthorized(message),
            AuthError::DependencyUnavailable(detail) => {
                tracing::error!(error = %detail, "Dependency failure while handling request");
                RpcError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

/// Success payload shared by every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponseData {
    pub user: UserData,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<UserClaims> for UserData {
    fn from(claims: UserClaims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            name: claims.name,
        }
    }
}

impl From<AuthResult> for AuthResponseData {
    fn from(result: AuthResult) -> Self {
        Self {
            user: result.user.into(),
            token: result.token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::errors::CredentialField;
    use crate::user::errors::EmailError;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (AuthError::UserAlreadyExists("a@x.com".to_string()), 400, "User already exists"),
            (
                AuthError::InvalidCredentials(CredentialField::Email),
                400,
                "Invalid credentials",
            ),
            (
                AuthError::InvalidCredentials(CredentialField::Password),
                400,
                "Invalid credentials",
            ),
            (AuthError::InvalidToken("Token is expired".to_string()), 401, "Token is expired"),
            (
                AuthError::DependencyUnavailable("connection refused at 10.0.0.5".to_string()),
                500,
                "Internal server error",
            ),
        ];

        for (error, status, message) in cases {
            let body = RpcErrorBody::from(RpcError::from(error));
            assert_eq!(body.status, status);
            assert_eq!(body.message, message);
        }
    }

    #[test]
    fn test_validation_error_keeps_message() {
        let error = AuthError::from(EmailError::InvalidFormat(
            "Missing separator character '@'.".to_string(),
        ));
        let body = RpcErrorBody::from(RpcError::from(error));

        assert_eq!(body.status, 400);
        assert!(body.message.starts_with("Invalid email"));
    }
}
