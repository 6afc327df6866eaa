//! Predicate outcomes.

/// Outcome of applying an acceptance predicate to one snapshot.
///
/// # Example
///
/// ```rust
/// use probe_poll::Verdict;
///
/// assert_eq!(Verdict::from(true), Verdict::Accept);
/// assert!(matches!(Verdict::from(false), Verdict::Retry(_)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The snapshot shows the expected state; stop polling.
    Accept,
    /// Not converged yet; poll again after the interval.
    Retry(String),
    /// The expectation can never be met; stop polling with an error.
    Fail(String),
}

impl Verdict {
    /// Ask for another attempt.
    pub fn retry(reason: impl Into<String>) -> Self {
        Self::Retry(reason.into())
    }

    /// Stop polling with an error.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail(reason.into())
    }

    /// Check if this verdict accepts the snapshot.
    #[must_use]
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

impl From<bool> for Verdict {
    fn from(accepted: bool) -> Self {
        if accepted {
            Self::Accept
        } else {
            Self::retry("not yet")
        }
    }
}
