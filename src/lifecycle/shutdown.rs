//! Shutdown coordination for the service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// One-way shutdown latch.
///
/// Cloning yields another handle to the same latch. Once triggered it stays
/// triggered; every long-running task can both poll it cheaply and await it.
#[derive(Clone)]
pub struct Shutdown {
    inner: Arc<Inner>,
}

struct Inner {
    requested: AtomicBool,
    tx: watch::Sender<bool>,
}

impl Shutdown {
    /// Create a new, untriggered shutdown latch.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                requested: AtomicBool::new(false),
                tx,
            }),
        }
    }

    /// Trigger the shutdown signal.
    ///
    /// Returns `true` only for the call that actually flipped the latch.
    pub fn trigger(&self) -> bool {
        if self.inner.requested.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.inner.tx.send_replace(true);
        true
    }

    /// Whether shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown has been requested.
    pub async fn requested(&self) {
        let mut rx = self.inner.tx.subscribe();
        // The sender lives as long as `self`, so this only returns once the value is true.
        let _ = rx.wait_for(|requested| *requested).await;
    }

    /// Wait for `duration` unless shutdown is requested first.
    ///
    /// Returns `true` if the full duration elapsed, `false` if the wait was
    /// cut short (or never started) because of shutdown.
    pub async fn sleep(&self, duration: Duration) -> bool {
        if self.is_requested() {
            return false;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.requested() => false,
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Shutdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shutdown")
            .field("requested", &self.is_requested())
            .finish()
    }
}
