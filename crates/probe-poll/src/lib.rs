//! # probe-poll
//!
//! Waits for a sidecar's configuration to converge.
//!
//! Configuration pushed by the control plane reaches proxies asynchronously,
//! so a single point-in-time check is flaky. [`ConvergencePoller`] samples the
//! proxy's config dump repeatedly and hands each snapshot to a predicate
//! until the predicate accepts it, fails permanently, the [`RetryPolicy`]
//! budget runs out, or the caller cancels through a [`CancelSignal`].
//!
//! - [`Verdict`] - Tagged predicate outcome: accept, retry or fail
//! - [`RetryPolicy`] - Interval, attempt and time budget, failure tolerance
//! - [`CancelController`] - Cooperative cancellation of in-flight polls
//! - [`Sidecar`] - Handle binding one proxy to a client and poller
//! - [`predicates`] - Ready-made predicates for cluster and locality checks
//!
//! ## Example
//!
//! ```rust,ignore
//! use probe_poll::{predicates, CancelSignal, ConvergencePoller, RetryPolicy};
//!
//! let poller = ConvergencePoller::new(exec);
//! let dump = poller
//!     .wait_for_convergence(
//!         &target,
//!         predicates::has_cluster_for_host("fake-eds-external-service-1.com"),
//!         &RetryPolicy::default(),
//!         &CancelSignal::never(),
//!     )
//!     .await?;
//! ```
//!
//! ## Concurrency
//!
//! A poll holds no shared mutable state, so polls of different proxies can
//! run side by side, e.g. with `futures::future::join_all`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod cancel;
pub mod config;
pub mod metrics;
pub mod predicates;
mod poller;
mod sidecar;
mod verdict;

pub use cancel::{CancelController, CancelSignal};
pub use config::{AttemptFailure, RetryPolicy};
pub use poller::ConvergencePoller;
pub use sidecar::Sidecar;
pub use verdict::Verdict;
