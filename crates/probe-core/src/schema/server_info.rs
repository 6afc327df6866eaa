//! Decoded `/server_info`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity, build and uptime state of a proxy.
///
/// `version` and `state` are required; a response without them is not a
/// server info message. Fields this crate does not interpret are kept as
/// opaque JSON.
///
/// # Example
///
/// ```rust
/// use probe_core::{ServerInfo, ServerState};
///
/// let info: ServerInfo = serde_json::from_str(
///     r#"{"version": "abc/1.28.0/Clean/RELEASE/BoringSSL", "state": "LIVE", "uptime_current_epoch": "42s"}"#,
/// ).unwrap();
/// assert_eq!(info.state, ServerState::Live);
/// assert_eq!(info.uptime_current_epoch.unwrap().as_secs(), 42);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Build version string.
    pub version: String,
    /// Lifecycle state of the server.
    pub state: ServerState,
    /// Hot restart compatibility version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hot_restart_version: Option<String>,
    /// Uptime since the last hot restart.
    #[serde(
        default,
        with = "super::duration::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub uptime_current_epoch: Option<Duration>,
    /// Uptime across all hot restarts.
    #[serde(
        default,
        with = "super::duration::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub uptime_all_epochs: Option<Duration>,
    /// Command line the proxy was started with.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub command_line_options: Value,
    /// Node identity presented to the control plane.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub node: Value,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerInfo {
    /// Node ID presented to the control plane, if reported.
    #[must_use]
    pub fn node_id(&self) -> Option<&str> {
        self.node.get("id").and_then(Value::as_str)
    }

    /// Check if the server is accepting traffic.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.state == ServerState::Live
    }
}

/// Server lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerState {
    /// Serving traffic.
    Live,
    /// Draining listeners ahead of shutdown.
    Draining,
    /// Initialization has not started.
    PreInitializing,
    /// Waiting for initial configuration.
    Initializing,
}
