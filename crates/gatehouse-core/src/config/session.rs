//! Session lifetime, cookie, and credential policy configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds, counted from login.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Name of the cookie carrying the session identifier.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Whether the session cookie carries the `Secure` attribute.
    #[serde(default)]
    pub secure_cookie: bool,
    /// Deadline for a single store operation in milliseconds.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,
    /// Optional upper bound on cache entry TTL in seconds.
    #[serde(default)]
    pub cache_ttl_cap_seconds: Option<u64>,
    /// Role assigned to identities created through registration.
    #[serde(default = "default_role")]
    pub default_role: String,
    /// Minimum password length accepted at registration.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl SessionConfig {
    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Deadline for a single store operation.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
            operation_timeout_ms: default_operation_timeout(),
            cache_ttl_cap_seconds: None,
            default_role: default_role(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_ttl() -> u64 {
    3600
}

fn default_cookie_name() -> String {
    "session_id".to_string()
}

fn default_operation_timeout() -> u64 {
    1500
}

fn default_role() -> String {
    "user".to_string()
}

fn default_password_min() -> usize {
    8
}
