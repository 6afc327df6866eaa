//! Sidecar identification.
//!
//! This module provides [`ProxyTarget`], which names one proxy container
//! inside one pod. Targets are created by test code when it binds to a
//! running workload and never change afterwards.

use std::fmt;

/// Name of the sidecar proxy container injected into mesh workloads.
pub const PROXY_CONTAINER_NAME: &str = "istio-proxy";

/// Identifies a single reachable sidecar instance.
///
/// # Example
///
/// ```rust
/// use probe_core::ProxyTarget;
///
/// let target = ProxyTarget::new("locality", "b-v1-5f7d", "istio-proxy");
/// assert_eq!(target.to_string(), "locality/b-v1-5f7d[istio-proxy]");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProxyTarget {
    namespace: String,
    pod: String,
    container: String,
}

impl ProxyTarget {
    /// Create a target for an explicit container.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        pod: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            pod: pod.into(),
            container: container.into(),
        }
    }

    /// Create a target for the injected sidecar container of a pod.
    #[must_use]
    pub fn sidecar(namespace: impl Into<String>, pod: impl Into<String>) -> Self {
        Self::new(namespace, pod, PROXY_CONTAINER_NAME)
    }

    /// The namespace of the pod.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The pod name.
    #[must_use]
    pub fn pod(&self) -> &str {
        &self.pod
    }

    /// The container name within the pod.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }
}

impl fmt::Display for ProxyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}[{}]", self.namespace, self.pod, self.container)
    }
}
