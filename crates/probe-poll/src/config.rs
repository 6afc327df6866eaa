//! Retry policy configuration.

use std::time::Duration;

use probe_core::{ProbeError, Result};

/// What a poll does when a single fetch fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AttemptFailure {
    /// Return the fetch error immediately.
    Abort,
    /// Count the attempt as "not converged" and keep polling.
    #[default]
    Tolerate,
}

/// Cadence and budget of a convergence poll.
///
/// The poll stops at whichever limit is reached first. At least one limit
/// must be set.
///
/// Defaults:
///
/// | field | default |
/// |---|---|
/// | `interval` | 500 ms |
/// | `max_attempts` | 60 |
/// | `max_duration` | 30 s |
/// | `on_attempt_failure` | [`AttemptFailure::Tolerate`] |
///
/// Tolerating fetch failures is the default because a sidecar that was just
/// scheduled often refuses exec or serves a partial admin response for a
/// moment; pass [`AttemptFailure::Abort`] when the proxy is known to be up.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use probe_poll::{AttemptFailure, RetryPolicy};
///
/// let policy = RetryPolicy::default()
///     .with_interval(Duration::from_secs(1))
///     .with_max_attempts(10)
///     .with_attempt_failure(AttemptFailure::Abort);
///
/// assert!(policy.validate().is_ok());
/// assert_eq!(policy.max_duration, Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait between attempts.
    pub interval: Duration,
    /// Maximum number of fetch attempts.
    pub max_attempts: Option<u32>,
    /// Maximum time spent polling, measured from the first attempt. A fetch
    /// still in flight at the deadline is abandoned. Values too large to add
    /// to the current instant leave the poll without a time limit.
    pub max_duration: Option<Duration>,
    /// Handling of failed fetches.
    pub on_attempt_failure: AttemptFailure,
}

impl RetryPolicy {
    /// Default wait between attempts.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

    /// Default attempt limit.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

    /// Default time limit.
    pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(30);

    /// Set the wait between attempts.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the attempt limit.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Remove the attempt limit; the time limit alone bounds the poll.
    #[must_use]
    pub fn without_attempt_limit(mut self) -> Self {
        self.max_attempts = None;
        self
    }

    /// Set the time limit.
    #[must_use]
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }

    /// Remove the time limit; the attempt limit alone bounds the poll.
    #[must_use]
    pub fn without_time_limit(mut self) -> Self {
        self.max_duration = None;
        self
    }

    /// Set how failed fetches are handled.
    #[must_use]
    pub fn with_attempt_failure(mut self, on_attempt_failure: AttemptFailure) -> Self {
        self.on_attempt_failure = on_attempt_failure;
        self
    }

    /// Check if failed fetches are retried.
    #[must_use]
    pub fn tolerates_failures(&self) -> bool {
        self.on_attempt_failure == AttemptFailure::Tolerate
    }

    /// Reject policies that would never poll or never stop.
    pub fn validate(&self) -> Result<()> {
        match (self.max_attempts, self.max_duration) {
            (None, None) => Err(ProbeError::Configuration(
                "retry policy needs max_attempts or max_duration".to_string(),
            )),
            (Some(0), _) => Err(ProbeError::Configuration(
                "retry policy max_attempts must be at least 1".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            max_attempts: Some(Self::DEFAULT_MAX_ATTEMPTS),
            max_duration: Some(Self::DEFAULT_MAX_DURATION),
            on_attempt_failure: AttemptFailure::default(),
        }
    }
}
