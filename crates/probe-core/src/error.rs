//! Error types for sidecar introspection.
//!
//! This module provides [`ProbeError`], the error type returned by admin
//! queries and convergence polls, and [`ExecFailure`], the error reported by
//! a remote-execution collaborator.

use std::fmt;
use std::time::Duration;

use crate::schema::ConfigDump;
use crate::ProxyTarget;

/// Failure reported by a remote-execution collaborator.
///
/// Transports usually have some output even when the command fails (curl
/// prints its own diagnostics, kubectl prints the API error), so the combined
/// output is kept next to the message.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ExecFailure {
    /// Description of the failure.
    pub message: String,
    /// Combined output produced before the command failed.
    pub output: String,
    /// Optional underlying error from the transport.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ExecFailure {
    /// Create a failure with a message and no output.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            output: String::new(),
            source: None,
        }
    }

    /// Attach the output the command produced.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Attach the underlying transport error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }
}

/// Comprehensive error type for admin queries and convergence polls.
///
/// Every variant names the proxy it concerns so that a failing assertion
/// reads without further context:
///
/// - [`RemoteExecution`](Self::RemoteExecution) and [`Decode`](Self::Decode)
///   come from a single admin fetch
/// - [`ConvergenceTimeout`](Self::ConvergenceTimeout),
///   [`PredicateFailed`](Self::PredicateFailed) and
///   [`Cancelled`](Self::Cancelled) are terminal states of a poll
///
/// # Example
///
/// ```rust
/// use probe_core::{ProbeError, ProxyTarget};
///
/// let err = ProbeError::PredicateFailed {
///     target: ProxyTarget::sidecar("default", "a-0"),
///     attempts: 1,
///     reason: "expected locality is malformed".to_string(),
/// };
/// assert!(err.to_string().contains("default/a-0"));
/// assert!(!err.is_fetch_failure());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The command could not run inside the target container.
    #[error("failed exec on pod {target}: {source}. Command: {command}. Output:\n{output}")]
    RemoteExecution {
        /// The proxy the command was sent to.
        target: ProxyTarget,
        /// The command string that was executed.
        command: String,
        /// Output captured from the failed command.
        output: String,
        /// The collaborator's failure.
        #[source]
        source: ExecFailure,
    },

    /// The admin response did not decode into the expected shape.
    #[error("failed parsing admin response from '/{resource}': {source}\nResponse: {response}")]
    Decode {
        /// The admin resource path that was queried.
        resource: String,
        /// The raw response body.
        response: String,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The predicate never accepted within the retry budget.
    #[error("{target} did not converge after {attempts} attempts ({elapsed:?}); last observed {last}")]
    ConvergenceTimeout {
        /// The proxy that was polled.
        target: ProxyTarget,
        /// Number of fetch attempts made.
        attempts: u32,
        /// Time spent polling.
        elapsed: Duration,
        /// What the final attempt observed.
        last: LastObservation,
    },

    /// The predicate decided the state cannot self-correct.
    #[error("config of {target} rejected on attempt {attempts}: {reason}")]
    PredicateFailed {
        /// The proxy that was polled.
        target: ProxyTarget,
        /// Number of fetch attempts made.
        attempts: u32,
        /// Reason given by the predicate.
        reason: String,
    },

    /// The caller cancelled the poll.
    #[error("poll of {target} cancelled after {attempts} attempts")]
    Cancelled {
        /// The proxy that was polled.
        target: ProxyTarget,
        /// Number of fetch attempts made before cancellation.
        attempts: u32,
    },

    /// Invalid configuration, such as a retry policy with no budget.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ProbeError {
    /// Whether this error came from a single admin fetch (execution or decode).
    #[must_use]
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::RemoteExecution { .. } | Self::Decode { .. })
    }

    /// The number of attempts a poll made, for poll-level errors.
    #[must_use]
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::ConvergenceTimeout { attempts, .. }
            | Self::PredicateFailed { attempts, .. }
            | Self::Cancelled { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    /// The final snapshot carried by a convergence timeout, if any.
    #[must_use]
    pub fn last_snapshot(&self) -> Option<&ConfigDump> {
        match self {
            Self::ConvergenceTimeout {
                last: LastObservation::Snapshot(dump),
                ..
            } => Some(dump),
            _ => None,
        }
    }
}

/// What a poll saw on its final attempt.
#[derive(Debug, Default)]
pub enum LastObservation {
    /// No attempt completed.
    #[default]
    Nothing,
    /// The final attempt returned a snapshot the predicate did not accept.
    Snapshot(Box<ConfigDump>),
    /// The final attempt failed and the failure was tolerated.
    Error(Box<ProbeError>),
}

impl LastObservation {
    /// Whether any attempt completed.
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }
}

impl fmt::Display for LastObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nothing => write!(f, "nothing"),
            Self::Snapshot(dump) => write!(f, "snapshot [{}]", dump.summary()),
            Self::Error(err) => write!(f, "error: {err}"),
        }
    }
}
