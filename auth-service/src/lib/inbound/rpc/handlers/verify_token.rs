use std::fmt;

use serde::Deserialize;

use super::AuthResponseData;
use super::RpcError;
use crate::domain::user::ports::AuthServicePort;

pub async fn verify_token<S: AuthServicePort>(
    service: &S,
    body: VerifyTokenRequest,
) -> Result<AuthResponseData, RpcError> {
    service
        .verify(&body.token)
        .await
        .map_err(RpcError::from)
        .map(AuthResponseData::from)
}

/// Request data for `auth.verify.token` (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

impl fmt::Debug for VerifyTokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyTokenRequest")
            .field("token", &"<redacted>")
            .finish()
    }
}
