//! Registration with the parent (orchestrating) server.
//!
//! # Data Flow
//! ```text
//! Lifecycle controller
//!     → cycle.rs (spawned once, runs until shutdown)
//!         Unregistered: client.rs POST /model/register
//!         Registered:   client.rs GET /
//!     → state.rs (connected flag + shutdown latch, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Failures are transient by definition: logged, never surfaced
//! - Fixed retry interval, unbounded attempts
//! - Parent access sits behind the `ParentClient` trait so the cycle can be
//!   driven by scripted parents in tests

pub mod client;
pub mod cycle;
pub mod state;
pub mod types;

pub use client::{HttpParentClient, ParentClient, ParentError};
pub use cycle::{Phase, RegistrationCycle};
pub use state::{ConnectionSnapshot, ConnectionState};
pub use types::{ParentEndpoint, RegistrationRequest, RetryPolicy, ServiceIdentity};
