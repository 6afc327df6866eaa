//! # probe-admin
//!
//! Queries the admin interface of a sidecar proxy from inside its pod.
//!
//! The admin interface listens on loopback only, so it is reached by running
//! `curl` inside the proxy container through a caller-supplied
//! [`RemoteExec`] collaborator. Each query is a single round trip:
//!
//! - [`AdminClient::fetch_server_info`] - decoded `/server_info`
//! - [`AdminClient::fetch_config_dump`] - decoded `/config_dump`
//!
//! There is no retry, caching or concurrency control at this layer; see the
//! `probe-poll` crate for convergence polling.
//!
//! ## Example
//!
//! ```rust,ignore
//! use probe_admin::AdminClient;
//! use probe_core::ProxyTarget;
//!
//! let client = AdminClient::new(kubectl_exec);
//! let target = ProxyTarget::sidecar("failover", "a-v1-7d9c6");
//!
//! let info = client.fetch_server_info(&target).await?;
//! println!("proxy {} is {:?}", info.version, info.state);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod exec;
pub mod mock;

pub use client::{admin_command, AdminClient, AdminResource, PROXY_ADMIN_PORT};
pub use exec::RemoteExec;
pub use mock::{ExecCall, MockExec};
