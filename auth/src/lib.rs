//! Credential primitives for the auth service.
//!
//! - Password hashing (Argon2id)
//! - JWT token signing and validation (HS256)
//! - Authentication coordination: verify a password, issue, validate and
//!   refresh tokens that carry a caller-defined payload
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//! use chrono::Duration;
//! use serde_json::json;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(2));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let user = json!({ "id": "user123", "name": "alice" });
//! let result = auth.authenticate("password123", &hash, &user).unwrap();
//!
//! // Verify: validate and re-sign
//! let (payload, fresh): (serde_json::Value, String) =
//!     auth.refresh_token(&result.access_token).unwrap();
//! assert_eq!(payload, user);
//! assert!(!fresh.is_empty());
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
