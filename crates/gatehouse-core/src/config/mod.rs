//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate, then overlaid with `GATEHOUSE__`-prefixed environment
//! variables. Configuration is loaded once at process start and is
//! immutable afterwards.

pub mod app;
pub mod cache;
pub mod database;
pub mod logging;
pub mod retry;
pub mod rpc;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::cache::{CacheConfig, MemoryCacheConfig, RedisCacheConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::retry::RetryConfig;
pub use self::rpc::RpcConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Public HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Internal identity RPC settings.
    #[serde(default)]
    pub rpc: RpcConfig,
    /// Relational store connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cache store settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Session lifetime and cookie settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with the `config/{env}.toml` overlay and
    /// environment variables prefixed with `GATEHOUSE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GATEHOUSE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.database.retry.validate("database")?;
        self.cache.retry.validate("cache")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let config = AppConfig::load_from("does/not/exist", "test").unwrap();
        assert_eq!(config.session.ttl_seconds, 3600);
        assert_eq!(config.session.cookie_name, "session_id");
        assert_eq!(config.cache.provider, "redis");
        assert_eq!(config.database.retry.max_retries, 5);
    }

    #[test]
    fn test_zero_retry_budget_fails_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.database.retry.max_retries = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
