//! Internal identity RPC configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identity RPC listener and client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Bind address of the internal listener.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port of the internal listener.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Deadline applied to every resolution, server and client side.
    #[serde(default = "default_deadline")]
    pub deadline_ms: u64,
    /// Base URL consumers use to reach the identity RPC service.
    #[serde(default = "default_client_url")]
    pub client_url: String,
}

impl RpcConfig {
    /// Socket address string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Deadline applied to every resolution.
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            deadline_ms: default_deadline(),
            client_url: default_client_url(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_deadline() -> u64 {
    2000
}

fn default_client_url() -> String {
    "http://127.0.0.1:8081".to_string()
}
