//! Remote execution collaborator.
//!
//! The crate never talks to a cluster itself. Whatever can run a command in
//! a container (a Kubernetes exec stream, `docker exec`, an in-memory fake)
//! implements [`RemoteExec`].

use std::sync::Arc;

use async_trait::async_trait;
use probe_core::ExecFailure;

/// Runs a shell command inside a named container of a named pod.
///
/// Implementations return the combined output on success. On failure they
/// should put whatever output was produced into [`ExecFailure::output`].
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use probe_admin::RemoteExec;
/// use probe_core::ExecFailure;
///
/// struct Unreachable;
///
/// #[async_trait]
/// impl RemoteExec for Unreachable {
///     async fn exec(
///         &self,
///         namespace: &str,
///         pod: &str,
///         _container: &str,
///         _command: &str,
///     ) -> Result<String, ExecFailure> {
///         Err(ExecFailure::new(format!("pod {namespace}/{pod} not found")))
///     }
/// }
/// ```
#[async_trait]
pub trait RemoteExec: Send + Sync {
    /// Execute `command` and return its combined output.
    async fn exec(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        command: &str,
    ) -> Result<String, ExecFailure>;
}

#[async_trait]
impl<T: RemoteExec + ?Sized> RemoteExec for Arc<T> {
    async fn exec(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        command: &str,
    ) -> Result<String, ExecFailure> {
        (**self).exec(namespace, pod, container, command).await
    }
}

#[async_trait]
impl<T: RemoteExec + ?Sized> RemoteExec for &T {
    async fn exec(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        command: &str,
    ) -> Result<String, ExecFailure> {
        (**self).exec(namespace, pod, container, command).await
    }
}
