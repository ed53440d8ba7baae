//! Start and stop the registration cycle.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;
use crate::registration::{
    ConnectionState, ParentClient, RegistrationCycle, RetryPolicy, ServiceIdentity,
};

/// Owns the background registration task and the shared connection state.
pub struct LifecycleController {
    identity: ServiceIdentity,
    client: Arc<dyn ParentClient>,
    policy: RetryPolicy,
    drain_grace: Duration,
    state: Arc<ConnectionState>,
    task: Mutex<Option<JoinHandle<()>>>,
    started: Mutex<bool>,
}

/// Snapshot reported by [`LifecycleController::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifecycleStatus {
    pub connected: bool,
    pub shutdown_requested: bool,
    pub running: bool,
}

impl LifecycleController {
    pub fn new(
        identity: ServiceIdentity,
        client: Arc<dyn ParentClient>,
        policy: RetryPolicy,
        drain_grace: Duration,
    ) -> Self {
        Self::with_shutdown(identity, client, policy, drain_grace, Shutdown::new())
    }

    /// Use an existing shutdown latch, e.g. one shared with the HTTP server.
    pub fn with_shutdown(
        identity: ServiceIdentity,
        client: Arc<dyn ParentClient>,
        policy: RetryPolicy,
        drain_grace: Duration,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            identity,
            client,
            policy,
            drain_grace,
            state: Arc::new(ConnectionState::with_shutdown(shutdown)),
            task: Mutex::new(None),
            started: Mutex::new(false),
        }
    }

    pub fn state(&self) -> &Arc<ConnectionState> {
        &self.state
    }

    pub fn shutdown_handle(&self) -> Shutdown {
        self.state.shutdown().clone()
    }

    /// Spawn the registration cycle in the unregistered state.
    ///
    /// Does not block. Only the first call spawns anything; calls after
    /// shutdown was requested are ignored. Must run inside a Tokio runtime.
    pub fn on_startup(&self) -> bool {
        let mut started = self.started.lock().unwrap_or_else(PoisonError::into_inner);
        if *started {
            tracing::warn!("Registration cycle already started");
            return false;
        }
        if self.state.is_shutdown_requested() {
            tracing::info!("Shutdown already requested, not starting registration cycle");
            return false;
        }
        *started = true;

        let cycle = RegistrationCycle::new(
            self.identity.clone(),
            self.client.clone(),
            self.state.clone(),
            self.policy,
        );
        let handle = tokio::spawn(cycle.run());
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        true
    }

    /// Request shutdown and wait for the cycle to finish.
    ///
    /// The wait is bounded by one retry interval plus the drain grace; a
    /// task still running after that is aborted. Repeated calls are no-ops.
    pub async fn on_shutdown(&self) {
        if self.state.request_shutdown() {
            tracing::info!("Shutdown requested, stopping registration cycle");
        } else {
            tracing::debug!("Shutdown already requested");
        }

        let handle = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(mut handle) = handle else {
            return;
        };

        let deadline = self.drain_deadline();
        match tokio::time::timeout(deadline, &mut handle).await {
            Ok(Ok(())) => tracing::info!("Registration cycle stopped"),
            Ok(Err(e)) => tracing::error!(error = %e, "Registration cycle ended abnormally"),
            Err(_) => {
                tracing::warn!(deadline = ?deadline, "Registration cycle did not stop in time, aborting");
                handle.abort();
            }
        }
    }

    /// Upper bound on how long `on_shutdown` waits for the cycle.
    pub fn drain_deadline(&self) -> Duration {
        self.policy.interval + self.drain_grace
    }

    pub fn status(&self) -> LifecycleStatus {
        let running = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished());
        let snapshot = self.state.snapshot();

        LifecycleStatus {
            connected: snapshot.connected,
            shutdown_requested: snapshot.shutdown_requested,
            running,
        }
    }
}
