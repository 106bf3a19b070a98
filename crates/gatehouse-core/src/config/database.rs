//! Relational store configuration.

use serde::{Deserialize, Serialize};

use super::retry::RetryConfig;

/// PostgreSQL connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Database port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Login role.
    #[serde(default = "default_user")]
    pub user: String,
    /// Login password.
    #[serde(default)]
    pub password: String,
    /// Database name.
    #[serde(default = "default_database")]
    pub database: String,
    /// libpq-style SSL mode (`disable`, `prefer`, `require`, ...).
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
    /// Maximum number of open connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of idle connections kept in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection acquire timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Startup probe retry policy.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl DatabaseConfig {
    /// Connection target without credentials, safe for logs.
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            database: default_database(),
            ssl_mode: default_ssl_mode(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_user() -> String {
    "gatehouse".to_string()
}

fn default_database() -> String {
    "gatehouse".to_string()
}

fn default_ssl_mode() -> String {
    "prefer".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    0
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}
