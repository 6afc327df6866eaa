//! Metrics for convergence polls.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! test binary installs a recorder.
//!
//! - `probe_poll_attempts_total{outcome}` - one per fetch attempt, with
//!   `outcome` one of `accepted`, `retry`, `rejected`, `fetch_error`
//! - `probe_poll_duration_seconds{result}` - time from first attempt to the
//!   terminal state, with `result` one of `converged`, `failed`,
//!   `timed_out`, `cancelled`

use std::time::Duration;

use metrics::{counter, histogram};

/// Outcome of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The predicate accepted the snapshot.
    Accepted,
    /// The predicate asked for another attempt.
    Retry,
    /// The predicate failed permanently.
    Rejected,
    /// The fetch failed.
    FetchError,
}

impl AttemptOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Retry => "retry",
            Self::Rejected => "rejected",
            Self::FetchError => "fetch_error",
        }
    }
}

/// Terminal state of a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    /// A snapshot was accepted.
    Converged,
    /// A fetch error aborted the poll or the predicate failed.
    Failed,
    /// The budget ran out.
    TimedOut,
    /// The caller cancelled.
    Cancelled,
}

impl PollResult {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::Failed => "failed",
            Self::TimedOut => "timed_out",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Record one fetch attempt.
pub fn record_attempt(outcome: AttemptOutcome) {
    counter!("probe_poll_attempts_total", "outcome" => outcome.as_str()).increment(1);
}

/// Record the end of a poll.
pub fn record_poll(result: PollResult, elapsed: Duration) {
    histogram!("probe_poll_duration_seconds", "result" => result.as_str())
        .record(elapsed.as_secs_f64());
}
