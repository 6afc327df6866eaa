//! # probe-core
//!
//! Core types and error handling shared by the sidecar introspection crates.
//!
//! - [`ProbeError`] - Error taxonomy for admin queries and convergence polling
//! - [`ProxyTarget`] - Identifies one sidecar container inside a pod
//! - [`Locality`] - Region/zone/sub-zone topology label
//! - [`HostnameSequence`] - Test-scoped unique hostname generator
//! - [`ServerInfo`] and [`ConfigDump`] - Decoded Envoy admin views
//!
//! ## Example
//!
//! ```rust
//! use probe_core::{Locality, ProxyTarget};
//!
//! let target = ProxyTarget::sidecar("failover", "a-v1-7d9c6");
//! assert_eq!(target.container(), "istio-proxy");
//!
//! let locality: Locality = "closeregion/zone/subzone".parse().unwrap();
//! assert_eq!(locality.region(), "closeregion");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod locality;
pub mod schema;
mod sequence;
mod target;

pub use error::{ExecFailure, LastObservation, ProbeError};
pub use locality::Locality;
pub use schema::{ConfigDump, ServerInfo, ServerState};
pub use sequence::HostnameSequence;
pub use target::{ProxyTarget, PROXY_CONTAINER_NAME};

/// Result type alias using [`ProbeError`].
pub type Result<T> = std::result::Result<T, ProbeError>;
