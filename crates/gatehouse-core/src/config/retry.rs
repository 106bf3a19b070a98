//! Startup probe retry configuration shared by every store.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Bounded retry policy for the initial liveness probe of a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Pause between failed probes in seconds.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Total number of probe attempts before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Deadline for a single probe in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u64,
}

impl RetryConfig {
    /// Pause between failed probes.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    /// Deadline for a single probe.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_seconds)
    }

    /// Rejects a policy that could never verify a store.
    pub fn validate(&self, section: &str) -> AppResult<()> {
        if self.max_retries == 0 {
            return Err(AppError::configuration(format!(
                "{section}.retry.max_retries must be at least 1"
            )));
        }
        if self.probe_timeout_seconds == 0 {
            return Err(AppError::configuration(format!(
                "{section}.retry.probe_timeout_seconds must be at least 1"
            )));
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
            max_retries: default_max_retries(),
            probe_timeout_seconds: default_probe_timeout(),
        }
    }
}

fn default_interval() -> u64 {
    2
}

fn default_max_retries() -> u32 {
    5
}

fn default_probe_timeout() -> u64 {
    3
}
