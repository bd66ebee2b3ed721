use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::errors::JwtError;

/// Names of the RFC 7519 registered claims.
///
/// These are owned by the signer and never travel as part of a payload.
pub const REGISTERED_CLAIMS: [&str; 7] = ["sub", "exp", "iat", "nbf", "iss", "aud", "jti"];

/// Generic JWT claims structure.
///
/// Standard RFC 7519 claims live in dedicated fields; the caller's payload
/// (user attributes) is flattened into `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user/entity identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// JWT ID (unique token identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Payload fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a payload into claims that expire after `ttl`.
    ///
    /// # Arguments
    /// * `payload` - Value serializing to a JSON object (e.g. user attributes)
    /// * `ttl` - Lifetime of the token measured from now
    ///
    /// # Returns
    /// Claims with iat, exp and the payload fields set
    ///
    /// # Errors
    /// * `InvalidPayload` - Payload does not serialize to a JSON object
    pub fn for_payload<T: Serialize>(payload: &T, ttl: Duration) -> Result<Self, JwtError> {
        let value =
            serde_json::to_value(payload).map_err(|e| JwtError::InvalidPayload(e.to_string()))?;

        let Value::Object(fields) = value else {
            return Err(JwtError::InvalidPayload(
                "payload must serialize to a JSON object".to_string(),
            ));
        };

        let extra = fields
            .into_iter()
            .filter(|(key, _)| !REGISTERED_CLAIMS.contains(&key.as_str()))
            .collect();

        let now = Utc::now();

        Ok(Self {
            exp: Some((now + ttl).timestamp()),
            iat: Some(now.timestamp()),
            extra,
            ..Self::default()
        })
    }

    /// Drop every registered claim and decode the remaining payload.
    ///
    /// # Errors
    /// * `InvalidPayload` - Remaining fields do not match `T`
    pub fn into_payload<T: DeserializeOwned>(self) -> Result<T, JwtError> {
        let fields = self.extra.into_iter().collect();

        serde_json::from_value(Value::Object(fields))
            .map_err(|e| JwtError::InvalidPayload(e.to_string()))
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: String) -> Self {
        self.iss = Some(iss);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }
}
