//! Connectivity supervisor: bounded-retry liveness verification for stores.
//!
//! Every store adapter opens its handle lazily and hands it to
//! [`establish_and_verify`] before the process starts serving. The retry
//! loop itself lives in [`verify_with`], which takes the failure reporter as
//! a callback so it can be exercised with a fake prober and a paused clock.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::RetryConfig;
use crate::deadline::with_deadline;
use crate::error::AppError;
use crate::result::AppResult;
use crate::traits::probe::Probe;

/// Attempt budget for verifying a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total probe attempts.
    pub max_attempts: u32,
    /// Pause after each failed attempt except the last.
    pub interval: Duration,
    /// Deadline for a single probe.
    pub probe_timeout: Duration,
}

impl RetryPolicy {
    /// Upper bound on time spent sleeping between attempts.
    pub fn max_backoff(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            interval: config.interval(),
            probe_timeout: config.probe_timeout(),
        }
    }
}

/// Probe `handle` until it answers or the attempt budget is spent.
///
/// Returns the 1-based attempt number that succeeded. `on_failure` is called
/// with the attempt number and error after every failed probe.
pub async fn verify_with<P, F>(handle: &P, policy: &RetryPolicy, mut on_failure: F) -> AppResult<u32>
where
    P: Probe + ?Sized,
    F: FnMut(u32, &AppError),
{
    if policy.max_attempts == 0 {
        return Err(AppError::configuration(format!(
            "{}: max_retries must be at least 1",
            handle.store_name()
        )));
    }

    let mut last_error = None;
    for attempt in 1..=policy.max_attempts {
        match with_deadline(policy.probe_timeout, handle.store_name(), handle.probe()).await {
            Ok(()) => return Ok(attempt),
            Err(e) => {
                on_failure(attempt, &e);
                last_error = Some(e);
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.interval).await;
                }
            }
        }
    }

    let cause = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no attempt made".to_string());
    Err(AppError::connectivity(format!(
        "{} unreachable after {} attempts: {cause}",
        handle.store_name(),
        policy.max_attempts
    )))
}

/// Verify that `handle` is live, logging each failed probe.
///
/// On success the handle is returned for use. On exhaustion the error is a
/// [`ErrorKind::Connectivity`] which the owning process treats as fatal.
///
/// [`ErrorKind::Connectivity`]: crate::error::ErrorKind::Connectivity
pub async fn establish_and_verify<P: Probe>(handle: P, policy: &RetryPolicy) -> AppResult<P> {
    let store = handle.store_name().to_string();
    info!(
        store = %store,
        max_attempts = policy.max_attempts,
        interval_ms = policy.interval.as_millis() as u64,
        "Verifying store connectivity"
    );

    let result = verify_with(&handle, policy, |attempt, err| {
        warn!(
            store = %store,
            attempt,
            max_attempts = policy.max_attempts,
            error = %err,
            "Store probe failed"
        );
    })
    .await;

    match result {
        Ok(attempts) => {
            info!(store = %store, attempts, "Store is reachable");
            Ok(handle)
        }
        Err(e) => {
            error!(store = %store, error = %e, "Giving up on store");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::ErrorKind;

    /// Fails the first `failures` probes, then succeeds.
    #[derive(Debug)]
    struct FlakyProbe {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyProbe {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Probe for FlakyProbe {
        fn store_name(&self) -> &str {
            "fake"
        }

        async fn probe(&self) -> AppResult<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(AppError::database("connection refused"))
            } else {
                Ok(())
            }
        }
    }

    /// Never answers.
    struct HangingProbe;

    #[async_trait]
    impl Probe for HangingProbe {
        fn store_name(&self) -> &str {
            "hanging"
        }

        async fn probe(&self) -> AppResult<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            interval: Duration::from_secs(2),
            probe_timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_first_try() {
        let probe = FlakyProbe::new(0);
        let attempt = verify_with(&probe, &policy(3), |_, _| {}).await.unwrap();
        assert_eq!(attempt, 1);
        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_n_failures_below_budget() {
        for failures in 0..5 {
            let probe = FlakyProbe::new(failures);
            let mut reported = Vec::new();
            let start = tokio::time::Instant::now();

            let attempt = verify_with(&probe, &policy(5), |n, _| reported.push(n))
                .await
                .unwrap();

            assert_eq!(attempt, failures + 1);
            assert_eq!(probe.calls(), failures + 1);
            assert_eq!(reported, (1..=failures).collect::<Vec<_>>());
            assert_eq!(start.elapsed(), Duration::from_secs(2) * failures);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fails_when_failures_reach_budget() {
        for failures in [3, 4, 10] {
            let probe = FlakyProbe::new(failures);
            let start = tokio::time::Instant::now();

            let err = verify_with(&probe, &policy(3), |_, _| {}).await.unwrap_err();

            assert_eq!(err.kind, ErrorKind::Connectivity);
            assert_eq!(probe.calls(), 3);
            // No pause after the final attempt.
            assert_eq!(start.elapsed(), policy(3).max_backoff());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_probe_counts_as_failure() {
        let mut kinds = Vec::new();
        let err = verify_with(&HangingProbe, &policy(2), |_, e| kinds.push(e.kind))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Connectivity);
        assert_eq!(kinds, vec![ErrorKind::Timeout, ErrorKind::Timeout]);
    }

    #[tokio::test]
    async fn test_zero_budget_is_configuration_error() {
        let probe = FlakyProbe::new(0);
        let err = verify_with(&probe, &policy(0), |_, _| {}).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_establish_returns_handle() {
        let probe = establish_and_verify(FlakyProbe::new(1), &policy(2)).await.unwrap();
        assert_eq!(probe.calls(), 2);
    }
}
