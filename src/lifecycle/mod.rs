//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Bind listener → Model init (background) → Ready → Start registration cycle
//!
//! Shutdown (controller.rs, shutdown.rs):
//!     Signal received → Readiness off → Latch shutdown
//!     → HTTP server drains + registration cycle exits → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - The listener starts immediately; readiness gates predictions instead
//! - One shutdown latch shared by every long-running task
//! - Shutdown has a deadline: the cycle is aborted if it overstays it

pub mod controller;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use controller::{LifecycleController, LifecycleStatus};
pub use shutdown::Shutdown;
