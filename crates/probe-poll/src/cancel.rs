//! Cooperative cancellation of polls.
//!
//! A test suite that hits its own timeout, or a scenario that gives up on one
//! proxy, cancels through a [`CancelController`]. Polls hold a
//! [`CancelSignal`] and check it before every attempt, while a fetch is in
//! flight, and during the wait between attempts.
//!
//! # Example
//!
//! ```rust
//! use probe_poll::CancelController;
//!
//! let controller = CancelController::new();
//! let signal = controller.signal();
//!
//! assert!(!signal.is_cancelled());
//! controller.cancel();
//! assert!(signal.is_cancelled());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

/// Owner side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelController {
    inner: Arc<CancelInner>,
}

#[derive(Debug)]
struct CancelInner {
    /// Whether cancellation has been requested.
    cancelled: AtomicBool,
    /// Sender for the cancellation signal.
    tx: watch::Sender<bool>,
    /// Receiver cloned into every signal.
    rx: watch::Receiver<bool>,
}

impl Default for CancelController {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelController {
    /// Create a controller that has not been cancelled.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            inner: Arc::new(CancelInner {
                cancelled: AtomicBool::new(false),
                tx,
                rx,
            }),
        }
    }

    /// Get a signal observing this controller.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: Some(self.inner.rx.clone()),
        }
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Request cancellation of every poll holding a signal.
    ///
    /// Repeated calls are no-ops.
    pub fn cancel(&self) {
        if self
            .inner
            .cancelled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        info!("cancelling in-flight polls");
        let _ = self.inner.tx.send(true);
    }
}

/// Observer side of a cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that is never cancelled.
    pub fn never() -> Self {
        Self { rx: None }
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Wait until cancellation is requested.
    ///
    /// Never resolves for [`CancelSignal::never`], or once every controller
    /// is gone without cancelling.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.rx else {
            return futures::future::pending().await;
        };

        let mut rx = rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return futures::future::pending().await;
            }
        }
    }
}
