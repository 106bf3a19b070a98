//! Redis connection management.

use async_trait::async_trait;
use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use gatehouse_core::config::{RedisCacheConfig, RetryConfig};
use gatehouse_core::connectivity::{RetryPolicy, establish_and_verify};
use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::Probe;

/// Unverified Redis handle used for the startup liveness probe.
#[derive(Debug, Clone)]
pub struct RedisProbe {
    client: Client,
}

impl RedisProbe {
    /// Open a client handle. No connection is made yet.
    pub fn open(config: &RedisCacheConfig) -> AppResult<Self> {
        let client = Client::open(config.url().as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Redis connection settings", e)
        })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Probe for RedisProbe {
    fn store_name(&self) -> &str {
        "redis"
    }

    async fn probe(&self) -> AppResult<()> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Cache, "Failed to connect to Redis", e))?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Cache, "Redis PING failed", e))?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(AppError::cache(format!("Unexpected PING reply: {pong}")))
        }
    }
}

/// Redis client wrapper with connection management.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis connection manager (multiplexed, reconnecting).
    conn: ConnectionManager,
    /// Key prefix for all keys.
    key_prefix: String,
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisClient {
    /// Connect to Redis, retrying the liveness probe per `retry`.
    pub async fn connect(config: &RedisCacheConfig, retry: &RetryConfig) -> AppResult<Self> {
        info!(
            target_cache = %config.display_target(),
            max_retries = retry.max_retries,
            "Connecting to Redis"
        );

        let probe = RedisProbe::open(config)?;
        let probe = establish_and_verify(probe, &RetryPolicy::from(retry)).await?;

        let conn = ConnectionManager::new(probe.client).await.map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Failed to connect to Redis", e)
        })?;

        info!("Successfully connected to Redis");
        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// Get a mutable clone of the connection manager.
    pub fn conn_mut(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Build a full key with the configured prefix.
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_does_not_connect() {
        let config = RedisCacheConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..RedisCacheConfig::default()
        };
        assert!(RedisProbe::open(&config).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_redis_fails_with_connectivity_error() {
        let config = RedisCacheConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..RedisCacheConfig::default()
        };
        let retry = RetryConfig {
            interval_seconds: 0,
            max_retries: 2,
            probe_timeout_seconds: 1,
        };
        let err = RedisClient::connect(&config, &retry).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Connectivity);
    }
}
