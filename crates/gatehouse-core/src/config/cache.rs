//! Cache store configuration.

use serde::{Deserialize, Serialize};

use super::retry::RetryConfig;

/// Top-level cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache provider type: `"redis"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis-specific configuration.
    #[serde(default)]
    pub redis: RedisCacheConfig,
    /// In-memory cache configuration.
    #[serde(default)]
    pub memory: MemoryCacheConfig,
    /// Startup probe retry policy.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            redis: RedisCacheConfig::default(),
            memory: MemoryCacheConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Redis cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    /// Redis host.
    #[serde(default = "default_redis_host")]
    pub host: String,
    /// Redis port.
    #[serde(default = "default_redis_port")]
    pub port: u16,
    /// Optional AUTH password.
    #[serde(default)]
    pub password: Option<String>,
    /// Logical database index.
    #[serde(default)]
    pub db: i64,
    /// Key prefix applied to every key this service writes.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl RedisCacheConfig {
    /// Build a `redis://` connection URL from the configured parts.
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) if !password.is_empty() => format!(
                "redis://:{password}@{}:{}/{}",
                self.host, self.port, self.db
            ),
            _ => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }

    /// Connection target without credentials, safe for logs.
    pub fn display_target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.db)
    }
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            host: default_redis_host(),
            port: default_redis_port(),
            password: None,
            db: 0,
            key_prefix: default_key_prefix(),
        }
    }
}

/// In-memory cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries in the cache.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_provider() -> String {
    "redis".to_string()
}

fn default_redis_host() -> String {
    "localhost".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

fn default_key_prefix() -> String {
    String::new()
}

fn default_max_capacity() -> u64 {
    100_000
}
