//! Shared connection state.
//!
//! # Invariants
//! - `connected` is written only by the registration cycle task
//! - shutdown is written only by the lifecycle controller, and only to true
//! - both flags are atomics, readable from any task without locking

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::lifecycle::Shutdown;

/// Registration status plus shutdown intent, shared by `Arc`.
#[derive(Debug, Default)]
pub struct ConnectionState {
    connected: AtomicBool,
    shutdown: Shutdown,
}

impl ConnectionState {
    /// Fresh state: not connected, no shutdown requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build state around an existing shutdown latch.
    pub fn with_shutdown(shutdown: Shutdown) -> Self {
        Self {
            connected: AtomicBool::new(false),
            shutdown,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown.is_requested()
    }

    /// Latch shutdown. Returns `true` only on the first call.
    pub fn request_shutdown(&self) -> bool {
        self.shutdown.trigger()
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot {
            connected: self.is_connected(),
            shutdown_requested: self.is_shutdown_requested(),
        }
    }
}

/// Point-in-time copy of [`ConnectionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectionSnapshot {
    pub connected: bool,
    pub shutdown_requested: bool,
}
