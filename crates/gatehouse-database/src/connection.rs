//! PostgreSQL connection pool management.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::info;

use gatehouse_core::config::DatabaseConfig;
use gatehouse_core::connectivity::{RetryPolicy, establish_and_verify};
use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::Probe;

/// Wrapper around the sqlx PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    /// The underlying sqlx connection pool.
    pool: PgPool,
}

impl DatabasePool {
    /// Build a pool without touching the network.
    ///
    /// Connections are opened on first use; call [`DatabasePool::connect`]
    /// to also verify the server answers.
    pub fn open(config: &DatabaseConfig) -> AppResult<Self> {
        let ssl_mode = PgSslMode::from_str(&config.ssl_mode).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid database ssl_mode '{}'", config.ssl_mode),
                e,
            )
        })?;

        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .ssl_mode(ssl_mode);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect_lazy_with(options);

        Ok(Self { pool })
    }

    /// Open the pool and block until the server answers or retries run out.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(
            target_db = %config.display_target(),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            max_retries = config.retry.max_retries,
            "Connecting to PostgreSQL"
        );

        let pool = Self::open(config)?;
        let pool = establish_and_verify(pool, &RetryPolicy::from(&config.retry)).await?;

        info!("Successfully connected to PostgreSQL");
        Ok(pool)
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

#[async_trait]
impl Probe for DatabasePool {
    fn store_name(&self) -> &str {
        "postgres"
    }

    async fn probe(&self) -> AppResult<()> {
        match self.health_check().await? {
            true => Ok(()),
            false => Err(AppError::database("Unexpected health check result")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_is_lazy() {
        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..DatabaseConfig::default()
        };
        let pool = DatabasePool::open(&config).unwrap();
        assert_eq!(pool.pool().size(), 0);
    }

    #[tokio::test]
    async fn test_open_rejects_unknown_ssl_mode() {
        let config = DatabaseConfig {
            ssl_mode: "sometimes".to_string(),
            ..DatabaseConfig::default()
        };
        let err = DatabasePool::open(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
