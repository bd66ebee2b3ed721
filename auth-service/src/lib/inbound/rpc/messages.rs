//! Wire types for the request/reply RPC protocol carried over Kafka.
//!
//! A request names the operation (`pattern`), where to send the reply
//! (`reply_to`) and a `correlation_id` the caller uses to match the reply.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::handlers::AuthResponseData;
use super::handlers::RpcError;

/// Message patterns understood by the service.
pub mod patterns {
    pub const REGISTER_USER: &str = "auth.register.user";
    pub const LOGIN_USER: &str = "auth.login.user";
    pub const VERIFY_TOKEN: &str = "auth.verify.token";
}

/// Incoming request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub correlation_id: String,
    pub reply_to: String,
    pub pattern: String,
    #[serde(default)]
    pub data: Value,
}

/// Minimal view of a request: just enough to route an error reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplyAddress {
    pub correlation_id: String,
    pub reply_to: String,
}

/// Outgoing reply envelope. Exactly one of `response` / `err` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcReply {
    pub correlation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AuthResponseData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<RpcErrorBody>,
}

impl RpcReply {
    pub fn success(correlation_id: String, response: AuthResponseData) -> Self {
        Self {
            correlation_id,
            response: Some(response),
            err: None,
        }
    }

    pub fn failure(correlation_id: String, error: RpcError) -> Self {
        Self {
            correlation_id,
            response: None,
            err: Some(error.into()),
        }
    }
}

/// Client-facing error object: a status code and a message, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorBody {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum RequestDecodeError {
    /// No reply address could be recovered; the request can only be dropped.
    #[error("Unroutable request: {0}")]
    Unroutable(String),

    /// The reply address is known but the envelope is otherwise invalid.
    #[error("Malformed request {}: {reason}", .address.correlation_id)]
    Malformed {
        address: ReplyAddress,
        reason: String,
    },
}

impl RpcRequest {
    /// Decode a raw message payload into a request envelope.
    ///
    /// # Errors
    /// * `Unroutable` - Payload is not JSON or lacks `correlation_id`/`reply_to`
    /// * `Malformed` - Reply address present, rest of the envelope invalid
    pub fn decode(payload: &[u8]) -> Result<Self, RequestDecodeError> {
        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| RequestDecodeError::Unroutable(e.to_string()))?;

        let address = ReplyAddress::deserialize(&value)
            .map_err(|e| RequestDecodeError::Unroutable(e.to_string()))?;

        RpcRequest::deserialize(value).map_err(|e| RequestDecodeError::Malformed {
            address,
            reason: e.to_string(),
        })
    }
}
