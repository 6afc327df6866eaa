//! Test-scoped unique hostnames.
//!
//! Scenario fixtures need hostnames that do not collide with fixtures from
//! parallel tests or from earlier runs against the same cluster. A
//! [`HostnameSequence`] is created by the test that owns the names and passed
//! to whatever needs them; there is no process-wide counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generator of unique hostnames of the form `{prefix}-{token}-{n}{suffix}`.
///
/// The token is derived from the creation time so that names from separate
/// runs differ; [`HostnameSequence::deterministic`] omits it.
///
/// # Example
///
/// ```rust
/// use probe_core::HostnameSequence;
///
/// let hosts = HostnameSequence::deterministic("fake-eds-external-service", ".com");
/// assert_eq!(hosts.next_hostname(), "fake-eds-external-service-0.com");
/// assert_eq!(hosts.next_hostname(), "fake-eds-external-service-1.com");
/// ```
#[derive(Debug)]
pub struct HostnameSequence {
    prefix: String,
    suffix: String,
    token: Option<String>,
    next: AtomicU64,
}

impl HostnameSequence {
    /// Create a sequence tagged with a per-run token.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;

        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            token: Some(format!("{:x}", timestamp)),
            next: AtomicU64::new(0),
        }
    }

    /// Create a sequence without a run token.
    pub fn deterministic(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            token: None,
            next: AtomicU64::new(0),
        }
    }

    /// Produce the next hostname.
    pub fn next_hostname(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        match &self.token {
            Some(token) => format!("{}-{}-{}{}", self.prefix, token, n, self.suffix),
            None => format!("{}-{}{}", self.prefix, n, self.suffix),
        }
    }

    /// Number of hostnames handed out so far.
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
