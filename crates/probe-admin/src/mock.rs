//! In-memory remote execution for tests.
//!
//! [`MockExec`] serves scripted responses in order and records every call,
//! which makes admin queries and polls deterministic without a cluster.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use probe_core::ExecFailure;

use crate::RemoteExec;

/// A command received by [`MockExec`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecCall {
    /// Namespace of the pod.
    pub namespace: String,
    /// Pod name.
    pub pod: String,
    /// Container name.
    pub container: String,
    /// The command string.
    pub command: String,
}

/// Test double that replays scripted responses.
///
/// Responses are consumed in order. Once the script is exhausted the
/// fallback set with [`MockExec::repeat_ok`] is returned; without one, every
/// further call fails.
///
/// # Example
///
/// ```rust
/// use probe_admin::{MockExec, RemoteExec};
/// use probe_core::ExecFailure;
///
/// # tokio_test_block_on(async {
/// let exec = MockExec::new()
///     .respond_err(ExecFailure::new("pod not ready"))
///     .respond_ok("{}");
///
/// assert!(exec.exec("ns", "pod", "istio-proxy", "true").await.is_err());
/// assert_eq!(exec.exec("ns", "pod", "istio-proxy", "true").await.unwrap(), "{}");
/// assert_eq!(exec.call_count(), 2);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockExec {
    state: Mutex<MockState>,
}

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<Result<String, ExecFailure>>,
    fallback: Option<String>,
    calls: Vec<ExecCall>,
}

impl MockExec {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a successful response to the script.
    #[must_use]
    pub fn respond_ok(self, output: impl Into<String>) -> Self {
        self.push(Ok(output.into()));
        self
    }

    /// Append a failure to the script.
    #[must_use]
    pub fn respond_err(self, failure: ExecFailure) -> Self {
        self.push(Err(failure));
        self
    }

    /// Return `output` for every call after the script runs out.
    #[must_use]
    pub fn repeat_ok(self, output: impl Into<String>) -> Self {
        self.lock().fallback = Some(output.into());
        self
    }

    /// Append a response to the script of a shared mock.
    pub fn push(&self, response: Result<String, ExecFailure>) {
        self.lock().script.push_back(response);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<ExecCall> {
        self.lock().calls.clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lock().script.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RemoteExec for MockExec {
    async fn exec(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        command: &str,
    ) -> Result<String, ExecFailure> {
        let mut state = self.lock();
        state.calls.push(ExecCall {
            namespace: namespace.to_string(),
            pod: pod.to_string(),
            container: container.to_string(),
            command: command.to_string(),
        });

        if let Some(response) = state.script.pop_front() {
            return response;
        }
        match &state.fallback {
            Some(output) => Ok(output.clone()),
            None => Err(ExecFailure::new(format!(
                "mock: no scripted response for '{command}' on {namespace}/{pod}"
            ))),
        }
    }
}
