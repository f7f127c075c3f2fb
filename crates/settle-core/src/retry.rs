//! Bounded retry around mutating API calls
//!
//! Some mutations fail transiently right after a dependency was created
//! (the dependency is not visible yet). [`retry`] re-issues the call while
//! the classifier says the error is retryable, backing off between attempts,
//! until it succeeds, fails for good, or the time budget runs out.

use crate::context::OperationContext;
use crate::error::{ApiError, RetryError};
use crate::waiter::PollPolicy;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Retry configuration for mutating calls
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total time budget for all attempts
    pub timeout: Duration,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5 * 60),
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    fn policy(&self) -> PollPolicy {
        PollPolicy {
            initial_delay: self.initial_delay,
            max_delay: self.max_delay,
            multiplier: self.backoff_multiplier,
        }
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// budget in `config` is spent
///
/// `is_retryable` decides per error. When time runs out the last retryable
/// error is returned inside [`RetryError::Timeout`].
pub async fn retry<T, F, Fut, P>(
    ctx: &OperationContext,
    config: &RetryConfig,
    is_retryable: P,
    mut op: F,
) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
    P: Fn(&ApiError) -> bool,
{
    let deadline = Instant::now() + config.timeout;
    let policy = config.policy();
    let mut attempt = 0u32;

    loop {
        if let Some(reason) = ctx.err() {
            return Err(reason.into());
        }

        let err = tokio::select! {
            result = op() => match result {
                Ok(value) => return Ok(value),
                Err(err) => err,
            },
            reason = ctx.done() => return Err(reason.into()),
        };

        if !is_retryable(&err) {
            return Err(RetryError::Api(err));
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(RetryError::Timeout {
                timeout: config.timeout,
                last_error: err,
            });
        }

        let delay = policy.delay_for_attempt(attempt).min(remaining);
        attempt = attempt.saturating_add(1);
        tracing::debug!(
            attempt,
            code = %err.code,
            delay_ms = delay.as_millis() as u64,
            "retryable error, retrying"
        );

        tokio::select! {
            _ = sleep(delay) => {}
            reason = ctx.done() => return Err(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContextError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn not_found() -> ApiError {
        ApiError::not_found("role not visible yet")
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_after_transient_errors() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let value = retry(
            &OperationContext::background(),
            &RetryConfig::default(),
            ApiError::is_not_found,
            || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move { if n < 2 { Err(not_found()) } else { Ok("created") } }
            },
        )
        .await
        .unwrap();

        assert_eq!(value, "created");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_aborts_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let err = retry(
            &OperationContext::background(),
            &RetryConfig::default(),
            ApiError::is_not_found,
            || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(ApiError::new("InvalidParameterCombinationException", "bad")) }
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RetryError::Api(ref e) if e.code == "InvalidParameterCombinationException"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_keeps_last_error() {
        let err = retry(
            &OperationContext::background(),
            &RetryConfig::with_timeout(Duration::from_secs(3)),
            ApiError::is_not_found,
            || async { Err::<(), _>(not_found()) },
        )
        .await
        .unwrap_err();

        match err {
            RetryError::Timeout { timeout, last_error } => {
                assert_eq!(timeout, Duration::from_secs(3));
                assert!(last_error.is_not_found());
            }
            other => panic!("Expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_context() {
        let ctx = OperationContext::background();
        ctx.cancel();

        let err = retry(&ctx, &RetryConfig::default(), ApiError::is_not_found, || async {
            Ok::<_, ApiError>(())
        })
        .await
        .unwrap_err();

        assert_eq!(err, RetryError::Context(ContextError::Cancelled));
    }
}
