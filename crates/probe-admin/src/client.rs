//! Admin query client.

use std::fmt;

use metrics::counter;
use probe_core::{ConfigDump, ProbeError, ProxyTarget, Result, ServerInfo};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::RemoteExec;

/// Port of the proxy's admin interface. Fixed by the sidecar injector.
pub const PROXY_ADMIN_PORT: u16 = 15000;

/// Read-only admin resources this client can decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdminResource {
    /// `/server_info`.
    ServerInfo,
    /// `/config_dump`.
    ConfigDump,
}

impl AdminResource {
    /// The resource path, without the leading slash.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::ServerInfo => "server_info",
            Self::ConfigDump => "config_dump",
        }
    }
}

impl fmt::Display for AdminResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

/// Build the command that fetches `resource` from inside the proxy container.
///
/// `-s` keeps curl's progress meter out of the combined output.
#[must_use]
pub fn admin_command(resource: AdminResource) -> String {
    format!(
        "curl -s http://127.0.0.1:{}/{}",
        PROXY_ADMIN_PORT,
        resource.path()
    )
}

/// Single-shot client for a proxy's admin interface.
///
/// Every call makes exactly one remote round trip and returns a freshly
/// decoded value. Failures are returned with the target, the command or
/// resource, and the raw output attached; nothing is retried here.
#[derive(Debug, Clone)]
pub struct AdminClient<E> {
    exec: E,
}

impl<E: RemoteExec> AdminClient<E> {
    /// Create a client on top of a remote execution collaborator.
    pub fn new(exec: E) -> Self {
        Self { exec }
    }

    /// Get the remote execution collaborator.
    pub fn exec(&self) -> &E {
        &self.exec
    }

    /// Fetch and decode `/server_info`.
    pub async fn fetch_server_info(&self, target: &ProxyTarget) -> Result<ServerInfo> {
        self.fetch_and_decode(target, AdminResource::ServerInfo).await
    }

    /// Fetch and decode `/config_dump`.
    pub async fn fetch_config_dump(&self, target: &ProxyTarget) -> Result<ConfigDump> {
        self.fetch_and_decode(target, AdminResource::ConfigDump).await
    }

    /// Fetch `resource` from `target` and decode it into `T`.
    pub async fn fetch_and_decode<T>(
        &self,
        target: &ProxyTarget,
        resource: AdminResource,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let command = admin_command(resource);
        debug!(proxy = %target, resource = resource.path(), "querying admin interface");

        let response = match self
            .exec
            .exec(target.namespace(), target.pod(), target.container(), &command)
            .await
        {
            Ok(response) => response,
            Err(failure) => {
                record_request(resource, "exec_error");
                warn!(
                    proxy = %target,
                    resource = resource.path(),
                    error = %failure,
                    "admin exec failed"
                );
                return Err(ProbeError::RemoteExecution {
                    target: target.clone(),
                    command,
                    output: failure.output.clone(),
                    source: failure,
                });
            }
        };

        match serde_json::from_str(&response) {
            Ok(decoded) => {
                record_request(resource, "ok");
                debug!(
                    proxy = %target,
                    resource = resource.path(),
                    bytes = response.len(),
                    "decoded admin response"
                );
                Ok(decoded)
            }
            Err(source) => {
                record_request(resource, "decode_error");
                warn!(
                    proxy = %target,
                    resource = resource.path(),
                    error = %source,
                    "admin response did not decode"
                );
                Err(ProbeError::Decode {
                    resource: resource.path().to_string(),
                    response,
                    source,
                })
            }
        }
    }
}

fn record_request(resource: AdminResource, outcome: &'static str) {
    counter!(
        "probe_admin_requests_total",
        "resource" => resource.path(),
        "outcome" => outcome
    )
    .increment(1);
}
