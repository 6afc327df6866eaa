//! Handle for one proxy.

use probe_admin::RemoteExec;
use probe_core::{ConfigDump, ProxyTarget, Result, ServerInfo};

use crate::{CancelSignal, ConvergencePoller, RetryPolicy, Verdict};

/// A proxy bound to the collaborator that reaches it.
///
/// Scenario code usually talks to a handful of named sidecars; this keeps
/// the target next to the poller so call sites only pass what varies.
#[derive(Debug, Clone)]
pub struct Sidecar<E> {
    target: ProxyTarget,
    poller: ConvergencePoller<E>,
}

impl<E: RemoteExec> Sidecar<E> {
    /// Bind `target` to `exec`.
    pub fn new(target: ProxyTarget, exec: E) -> Self {
        Self {
            target,
            poller: ConvergencePoller::new(exec),
        }
    }

    /// Get the proxy this handle talks to.
    pub fn target(&self) -> &ProxyTarget {
        &self.target
    }

    /// Get the poller used by [`wait_for_config`](Self::wait_for_config).
    pub fn poller(&self) -> &ConvergencePoller<E> {
        &self.poller
    }

    /// Fetch the proxy's server info once.
    pub async fn info(&self) -> Result<ServerInfo> {
        self.poller.client().fetch_server_info(&self.target).await
    }

    /// Fetch the proxy's config dump once.
    pub async fn config(&self) -> Result<ConfigDump> {
        self.poller.client().fetch_config_dump(&self.target).await
    }

    /// Poll the proxy until `predicate` accepts its config dump.
    pub async fn wait_for_config<P>(
        &self,
        predicate: P,
        policy: &RetryPolicy,
        cancel: &CancelSignal,
    ) -> Result<ConfigDump>
    where
        P: FnMut(&ConfigDump) -> Verdict,
    {
        self.poller
            .wait_for_convergence(&self.target, predicate, policy, cancel)
            .await
    }
}
