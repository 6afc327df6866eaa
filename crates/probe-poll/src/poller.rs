//! Convergence poller.

use probe_admin::{AdminClient, RemoteExec};
use probe_core::{ConfigDump, LastObservation, ProbeError, ProxyTarget, Result};
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::metrics::{record_attempt, record_poll, AttemptOutcome, PollResult};
use crate::{CancelSignal, RetryPolicy, Verdict};

/// Repeatedly samples a proxy's config dump until a predicate accepts it.
///
/// One call to [`wait_for_convergence`](Self::wait_for_convergence) moves
/// through these states:
///
/// ```text
///            Retry / tolerated fetch error
///   Sampling ----------------------------> Waiting
///      ^                                      |
///      +-------------- interval --------------+
///
///   Sampling -> Accepted     predicate accepted
///   Sampling -> Failed       fetch error (abort) or predicate failed
///   Sampling/Waiting -> TimedOut   attempt or time budget exhausted
///   any -> Cancelled         cancel signal observed
/// ```
///
/// Every snapshot handed to the predicate is the decode of one response;
/// snapshots from different attempts are never merged.
#[derive(Debug, Clone)]
pub struct ConvergencePoller<E> {
    client: AdminClient<E>,
}

impl<E: RemoteExec> ConvergencePoller<E> {
    /// Create a poller on top of a remote execution collaborator.
    pub fn new(exec: E) -> Self {
        Self::with_client(AdminClient::new(exec))
    }

    /// Create a poller on top of an existing admin client.
    pub fn with_client(client: AdminClient<E>) -> Self {
        Self { client }
    }

    /// Get the admin client used for fetches.
    pub fn client(&self) -> &AdminClient<E> {
        &self.client
    }

    /// Poll `target` until `predicate` accepts its config dump.
    ///
    /// Returns the accepted snapshot. Errors:
    ///
    /// - [`ProbeError::Configuration`] if the policy has no budget
    /// - the fetch error itself, when the policy aborts on fetch failures
    /// - [`ProbeError::PredicateFailed`] when the predicate returns
    ///   [`Verdict::Fail`]
    /// - [`ProbeError::ConvergenceTimeout`] with the final snapshot or error
    ///   once the budget is exhausted
    /// - [`ProbeError::Cancelled`] when `cancel` fires
    pub async fn wait_for_convergence<P>(
        &self,
        target: &ProxyTarget,
        mut predicate: P,
        policy: &RetryPolicy,
        cancel: &CancelSignal,
    ) -> Result<ConfigDump>
    where
        P: FnMut(&ConfigDump) -> Verdict,
    {
        policy.validate()?;

        let start = Instant::now();
        // A budget too large to represent as an instant is no budget at all.
        let deadline = policy.max_duration.and_then(|d| start.checked_add(d));
        let mut attempts: u32 = 0;
        let mut last = LastObservation::Nothing;

        let cancelled = |attempts: u32| {
            record_poll(PollResult::Cancelled, start.elapsed());
            info!(proxy = %target, attempts, "poll cancelled");
            ProbeError::Cancelled {
                target: target.clone(),
                attempts,
            }
        };

        loop {
            if cancel.is_cancelled() {
                return Err(cancelled(attempts));
            }

            attempts += 1;
            debug!(proxy = %target, attempt = attempts, "sampling config dump");

            let fetched = tokio::select! {
                biased;
                fetched = self.client.fetch_config_dump(target) => fetched,
                _ = cancel.cancelled() => return Err(cancelled(attempts)),
                _ = until(deadline) => {
                    record_attempt(AttemptOutcome::FetchError);
                    warn!(proxy = %target, attempt = attempts, "fetch outlived the time budget");
                    break;
                }
            };

            match fetched {
                Ok(dump) => match predicate(&dump) {
                    Verdict::Accept => {
                        record_attempt(AttemptOutcome::Accepted);
                        record_poll(PollResult::Converged, start.elapsed());
                        info!(proxy = %target, attempts, "config converged");
                        return Ok(dump);
                    }
                    Verdict::Fail(reason) => {
                        record_attempt(AttemptOutcome::Rejected);
                        record_poll(PollResult::Failed, start.elapsed());
                        warn!(proxy = %target, attempts, %reason, "predicate rejected config");
                        return Err(ProbeError::PredicateFailed {
                            target: target.clone(),
                            attempts,
                            reason,
                        });
                    }
                    Verdict::Retry(reason) => {
                        record_attempt(AttemptOutcome::Retry);
                        debug!(
                            proxy = %target,
                            attempt = attempts,
                            %reason,
                            "config not converged yet"
                        );
                        last = LastObservation::Snapshot(Box::new(dump));
                    }
                },
                Err(err) => {
                    record_attempt(AttemptOutcome::FetchError);
                    if !policy.tolerates_failures() {
                        record_poll(PollResult::Failed, start.elapsed());
                        warn!(
                            proxy = %target,
                            attempts,
                            error = %err,
                            "fetch failed, aborting poll"
                        );
                        return Err(err);
                    }
                    debug!(
                        proxy = %target,
                        attempt = attempts,
                        error = %err,
                        "fetch failed, will retry"
                    );
                    last = LastObservation::Error(Box::new(err));
                }
            }

            if policy.max_attempts.is_some_and(|max| attempts >= max) {
                break;
            }

            let wait = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    policy.interval.min(deadline - now)
                }
                None => policy.interval,
            };

            tokio::select! {
                _ = sleep(wait) => {}
                _ = cancel.cancelled() => return Err(cancelled(attempts)),
            }

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                break;
            }
        }

        let elapsed = start.elapsed();
        record_poll(PollResult::TimedOut, elapsed);
        warn!(proxy = %target, attempts, ?elapsed, last = %last, "config did not converge");
        Err(ProbeError::ConvergenceTimeout {
            target: target.clone(),
            attempts,
            elapsed,
            last,
        })
    }
}

/// Resolve at `deadline`, or never without one.
async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => futures::future::pending().await,
    }
}
