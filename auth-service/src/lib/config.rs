use std::env;
use std::ops::RangeInclusive;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub kafka: KafkaConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub login: LoginConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    /// Comma-separated broker addresses.
    pub brokers: String,
    pub group_id: String,
    /// Topic the service consumes RPC requests from.
    pub request_topic: String,
    /// Where a new consumer group starts reading the request topic.
    #[serde(default = "default_auto_offset_reset")]
    pub auto_offset_reset: String,
}

#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

impl JwtConfig {
    /// One hour up to one year.
    pub const EXPIRATION_HOURS_RANGE: RangeInclusive<i64> = 1..=8760;
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct LoginConfig {
    /// Name the failing field ("email" or "password") in login error messages.
    #[serde(default)]
    pub reveal_credential_field: bool,
}

fn default_max_connections() -> u32 {
    5
}

fn default_auto_offset_reset() -> String {
    "latest".to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, KAFKA__BROKERS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values that would make the service unusable once running.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".to_string()));
        }

        if !JwtConfig::EXPIRATION_HOURS_RANGE.contains(&self.jwt.expiration_hours) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be within {}..={}, got {}",
                JwtConfig::EXPIRATION_HOURS_RANGE.start(),
                JwtConfig::EXPIRATION_HOURS_RANGE.end(),
                self.jwt.expiration_hours
            )));
        }

        Ok(())
    }
}
