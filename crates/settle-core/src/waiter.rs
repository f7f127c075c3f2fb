//! State-change waiter (exponential backoff polling)
//!
//! A remote resource moves through transitional states on its own schedule.
//! [`StateChangeConf`] partitions the status space into `pending` (keep
//! polling), `target` (done) and everything else (unexpected, fail fast), and
//! polls a refresh function until one of those outcomes, the timeout, or
//! cancellation of the [`OperationContext`].

use crate::context::OperationContext;
use crate::error::{ApiError, WaitError};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep, sleep_until};

/// Consecutive "not found" polls tolerated while waiting for a target state
pub const DEFAULT_NOT_FOUND_CHECKS: u32 = 20;

/// Observation returned by one refresh call
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshResult<T> {
    /// Full snapshot of the resource, `None` when it does not exist
    pub object: Option<T>,
    /// Lifecycle status extracted from the snapshot, empty when gone
    pub state: String,
}

impl<T> RefreshResult<T> {
    pub fn new(object: T, state: impl Into<String>) -> Self {
        Self {
            object: Some(object),
            state: state.into(),
        }
    }

    /// The resource does not exist (any more)
    pub fn gone() -> Self {
        Self {
            object: None,
            state: String::new(),
        }
    }

    pub fn is_gone(&self) -> bool {
        self.object.is_none() || self.state.is_empty()
    }
}

/// Interval schedule between polls
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// First (and minimum) interval
    pub initial_delay: Duration,
    /// Upper bound for the interval
    pub max_delay: Duration,
    /// Growth factor applied after every pending poll
    pub multiplier: f64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl PollPolicy {
    pub fn fixed(interval: Duration) -> Self {
        Self {
            initial_delay: interval,
            max_delay: interval,
            multiplier: 1.0,
        }
    }

    /// Interval to sleep after the given (zero-based) poll
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(i32::MAX as u32) as i32;
        let delay = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        if !delay.is_finite() || delay >= self.max_delay.as_secs_f64() {
            return self.max_delay.max(self.initial_delay);
        }
        // 負の multiplier でも初期間隔より短くはしない
        Duration::from_secs_f64(delay.max(0.0)).max(self.initial_delay)
    }
}

/// A failed wait together with the last snapshot that was observed
#[derive(Debug)]
pub struct WaitFailure<T> {
    pub error: WaitError,
    pub last: Option<T>,
}

impl<T> WaitFailure<T> {
    fn new(error: impl Into<WaitError>, last: Option<T>) -> Self {
        Self {
            error: error.into(),
            last,
        }
    }

    pub fn into_error(self) -> WaitError {
        self.error
    }
}

/// Configuration of one state-change wait
///
/// Built per call site and discarded once the wait returns.
#[derive(Debug, Clone)]
pub struct StateChangeConf {
    pending: Vec<String>,
    target: Vec<String>,
    timeout: Duration,
    delay: Duration,
    min_timeout: Duration,
    poll_interval: Option<Duration>,
    not_found_checks: u32,
    continuous_target_occurence: u32,
    policy: PollPolicy,
}

impl StateChangeConf {
    pub fn new(pending: &[&str], target: &[&str], timeout: Duration) -> Self {
        Self {
            pending: pending.iter().map(|s| s.to_string()).collect(),
            target: target.iter().map(|s| s.to_string()).collect(),
            timeout,
            delay: Duration::ZERO,
            min_timeout: Duration::ZERO,
            poll_interval: None,
            not_found_checks: DEFAULT_NOT_FOUND_CHECKS,
            continuous_target_occurence: 1,
            policy: PollPolicy::default(),
        }
    }

    /// Sleep before the first refresh
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Never sleep less than this between polls
    pub fn with_min_timeout(mut self, min_timeout: Duration) -> Self {
        self.min_timeout = min_timeout;
        self
    }

    /// Fixed interval between polls, overriding the backoff schedule
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn with_not_found_checks(mut self, checks: u32) -> Self {
        self.not_found_checks = checks;
        self
    }

    /// Require the target state to be observed this many times in a row
    pub fn with_continuous_target_occurence(mut self, count: u32) -> Self {
        self.continuous_target_occurence = count.max(1);
        self
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn target(&self) -> &[String] {
        &self.target
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn interval_for(&self, attempt: u32) -> Duration {
        let interval = match self.poll_interval {
            Some(fixed) => fixed,
            None => self.policy.delay_for_attempt(attempt),
        };
        interval.max(self.min_timeout)
    }

    fn timeout_error(&self, last_state: &str) -> WaitError {
        WaitError::Timeout {
            timeout: self.timeout,
            last_state: last_state.to_string(),
            expected: self.target.clone(),
            last_error: None,
        }
    }

    /// Poll `refresh` until the resource reaches a target state
    ///
    /// Returns the snapshot from the final refresh, or `None` when the target
    /// set is empty and the resource is gone. On failure the last observed
    /// snapshot travels with the error so the caller can enrich it with
    /// resource-reported failure detail.
    pub async fn wait_for_state<T, F, Fut>(
        &self,
        ctx: &OperationContext,
        mut refresh: F,
    ) -> Result<Option<T>, WaitFailure<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RefreshResult<T>, ApiError>>,
    {
        let deadline = Instant::now() + self.timeout;
        let mut last: Option<T> = None;
        let mut last_state = String::new();
        let mut not_found_ticks = 0u32;
        let mut target_occurence = 0u32;
        let mut attempt = 0u32;

        if !self.delay.is_zero() {
            tokio::select! {
                _ = sleep(self.delay.min(self.timeout)) => {}
                reason = ctx.done() => return Err(WaitFailure::new(reason, last)),
            }
        }

        loop {
            if let Some(reason) = ctx.err() {
                return Err(WaitFailure::new(reason, last));
            }
            if Instant::now() >= deadline {
                return Err(WaitFailure::new(self.timeout_error(&last_state), last));
            }

            let refreshed = tokio::select! {
                refreshed = refresh() => refreshed,
                reason = ctx.done() => return Err(WaitFailure::new(reason, last)),
                _ = sleep_until(deadline) => {
                    return Err(WaitFailure::new(self.timeout_error(&last_state), last));
                }
            };

            let current = match refreshed {
                Ok(current) => current,
                Err(err) => return Err(WaitFailure::new(WaitError::Refresh(err), None)),
            };

            tracing::debug!(
                attempt,
                state = %current.state,
                pending = ?self.pending,
                target = ?self.target,
                "refreshed resource state"
            );

            if current.is_gone() {
                if self.target.is_empty() {
                    target_occurence += 1;
                    if target_occurence >= self.continuous_target_occurence {
                        return Ok(None);
                    }
                } else {
                    not_found_ticks += 1;
                    if not_found_ticks > self.not_found_checks {
                        return Err(WaitFailure::new(
                            WaitError::NotFound {
                                checks: self.not_found_checks,
                            },
                            last,
                        ));
                    }
                }
            } else {
                not_found_ticks = 0;
                let state = current.state;
                last = current.object;

                if self.target.contains(&state) {
                    target_occurence += 1;
                    if target_occurence >= self.continuous_target_occurence {
                        return Ok(last);
                    }
                } else if self.pending.contains(&state) {
                    target_occurence = 0;
                } else {
                    return Err(WaitFailure::new(
                        WaitError::UnexpectedState {
                            state,
                            expected: self.target.clone(),
                            last_error: None,
                        },
                        last,
                    ));
                }
                last_state = state;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(WaitFailure::new(self.timeout_error(&last_state), last));
            }

            let wait = self.interval_for(attempt).min(remaining);
            attempt = attempt.saturating_add(1);
            tracing::trace!(delay_ms = wait.as_millis() as u64, "sleeping before next refresh");

            tokio::select! {
                _ = sleep(wait) => {}
                reason = ctx.done() => return Err(WaitFailure::new(reason, last)),
            }
        }
    }
}
