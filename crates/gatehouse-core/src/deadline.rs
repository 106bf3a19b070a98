//! Deadline enforcement for store and RPC operations.

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;
use crate::result::AppResult;

/// Run `fut` under `deadline`, mapping an overrun to [`ErrorKind::Timeout`].
///
/// [`ErrorKind::Timeout`]: crate::error::ErrorKind::Timeout
pub async fn with_deadline<T, F>(deadline: Duration, operation: &str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::timeout(format!(
            "{operation} exceeded {}ms deadline",
            deadline.as_millis()
        ))),
    }
}
