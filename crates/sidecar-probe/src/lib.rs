//! # sidecar-probe
//!
//! Introspection of Envoy sidecars for multi-cluster integration tests.
//!
//! Tests that exercise a service mesh need to know what configuration a
//! proxy actually holds before they send traffic. This crate queries a
//! sidecar's admin interface from inside its container and waits for the
//! configuration to converge:
//!
//! - Single-shot queries for `/server_info` and `/config_dump`
//! - Typed views of clusters, listeners, routes and endpoint localities
//! - Convergence polling with attempt and time budgets
//! - Cooperative cancellation of in-flight polls
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sidecar_probe::prelude::*;
//!
//! let sidecar = Sidecar::new(ProxyTarget::sidecar("failover", "a-v1-0"), exec);
//!
//! let info = sidecar.info().await?;
//! assert!(info.is_live());
//!
//! let dump = sidecar
//!     .wait_for_config(
//!         predicates::has_cluster_for_host("fake-eds-external-service-1.com"),
//!         &RetryPolicy::default(),
//!         &CancelSignal::never(),
//!     )
//!     .await?;
//! ```
//!
//! ## Architecture
//!
//! - `probe-core` - Targets, admin payload schema, localities and errors
//! - `probe-admin` - Remote execution seam and the admin query client
//! - `probe-poll` - Retry policy, predicates, cancellation and the poller
//!
//! This crate re-exports all public APIs for convenience.
//!
//! ## Design Principles
//!
//! 1. **No panics in library code** - All errors are returned as `Result`
//! 2. **No transport of its own** - Commands run through [`admin::RemoteExec`]
//! 3. **One response, one snapshot** - Polls never merge partial dumps
//! 4. **Observable** - Every fetch and poll emits tracing events and metrics

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(missing_docs)]

// Re-export all sub-crates
pub use probe_admin as admin;
pub use probe_core as core;
pub use probe_poll as poll;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use sidecar_probe::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use probe_core::{
        ConfigDump, ExecFailure, HostnameSequence, LastObservation, Locality, ProbeError,
        ProxyTarget, Result, ServerInfo, ServerState,
    };

    // Admin queries
    pub use probe_admin::{AdminClient, AdminResource, MockExec, RemoteExec};

    // Polling
    pub use probe_poll::{
        predicates, AttemptFailure, CancelController, CancelSignal, ConvergencePoller,
        RetryPolicy, Sidecar, Verdict,
    };
}

/// Version information for this crate.
pub mod version {
    /// Crate version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Minimum supported Rust version.
    pub const MSRV: &str = "1.75";

    /// Get version info as a string.
    pub fn version_string() -> String {
        format!("sidecar-probe {} (MSRV {})", VERSION, MSRV)
    }
}
