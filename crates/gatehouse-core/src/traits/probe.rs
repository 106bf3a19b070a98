//! Liveness probe trait used by the connectivity supervisor.

use async_trait::async_trait;

use crate::result::AppResult;

/// A connection handle that can verify its backing store is reachable.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Short name of the store, used in logs (`"postgres"`, `"redis"`).
    fn store_name(&self) -> &str;

    /// Perform one liveness check.
    async fn probe(&self) -> AppResult<()>;
}
