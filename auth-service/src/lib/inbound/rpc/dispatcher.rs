use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::verify_token::verify_token;
use super::handlers::AuthResponseData;
use super::handlers::RpcError;
use super::messages::patterns;
use super::messages::RpcReply;
use super::messages::RpcRequest;
use crate::domain::user::ports::AuthServicePort;

/// Routes a decoded request to the handler registered for its pattern.
pub struct RpcDispatcher<S: AuthServicePort> {
    service: Arc<S>,
    reveal_credential_field: bool,
}

impl<S: AuthServicePort> RpcDispatcher<S> {
    pub fn new(service: Arc<S>, reveal_credential_field: bool) -> Self {
        Self {
            service,
            reveal_credential_field,
        }
    }

    /// Handle one request and build the reply for it. Never fails: every
    /// error becomes an `err` reply.
    pub async fn handle(&self, request: RpcRequest) -> RpcReply {
        let RpcRequest {
            correlation_id,
            pattern,
            data,
            ..
        } = request;

        tracing::debug!(
            correlation_id = %correlation_id,
            pattern = %pattern,
            "Handling request"
        );

        match self.dispatch(&pattern, data).await {
            Ok(response) => {
                tracing::debug!(
                    correlation_id = %correlation_id,
                    pattern = %pattern,
                    "Request succeeded"
                );
                RpcReply::success(correlation_id, response)
            }
            Err(error) => {
                tracing::info!(
                    correlation_id = %correlation_id,
                    pattern = %pattern,
                    status = error.status(),
                    "Request failed"
                );
                RpcReply::failure(correlation_id, error)
            }
        }
    }

    pub async fn dispatch(&self, pattern: &str, data: Value) -> Result<AuthResponseData, RpcError> {
        match pattern {
            patterns::REGISTER_USER => register(self.service.as_ref(), parse_data(data)?).await,
            patterns::LOGIN_USER => {
                login(
                    self.service.as_ref(),
                    parse_data(data)?,
                    self.reveal_credential_field,
                )
                .await
            }
            patterns::VERIFY_TOKEN => verify_token(self.service.as_ref(), parse_data(data)?).await,
            unknown => Err(RpcError::BadRequest(format!(
                "Unknown message pattern: {}",
                unknown
            ))),
        }
    }
}

fn parse_data<T: DeserializeOwned>(data: Value) -> Result<T, RpcError> {
    serde_json::from_value(data)
        .map_err(|e| RpcError::BadRequest(format!("Invalid request payload: {}", e)))
}
