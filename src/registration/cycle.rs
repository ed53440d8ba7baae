//! The registration / heartbeat state machine.
//!
//! # States
//! - Unregistered: keep announcing ourselves to the parent
//! - Registered: keep probing the parent for liveness
//!
//! # State Transitions
//! ```text
//! Unregistered → Registered: registration returns 2xx
//! Unregistered → Unregistered: registration fails, wait one interval
//! Registered → Registered: probe returns 2xx, wait one interval
//! Registered → Unregistered: probe fails, no wait
//! any → (exit): shutdown requested
//! ```
//!
//! # Design Decisions
//! - One loop over an explicit state, not mutually recursive loops
//! - Shutdown is checked before every network call, so none is issued after it
//! - Waits race the shutdown latch instead of sleeping in fixed slices
//! - An in-flight call is never cancelled; the client bounds it with a timeout

use std::sync::Arc;

use crate::observability::metrics;
use crate::registration::client::ParentClient;
use crate::registration::state::ConnectionState;
use crate::registration::types::{RetryPolicy, ServiceIdentity};

/// Which side of the cycle the task is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unregistered,
    Registered,
}

/// Background task keeping this service registered with its parent.
pub struct RegistrationCycle {
    identity: ServiceIdentity,
    client: Arc<dyn ParentClient>,
    state: Arc<ConnectionState>,
    policy: RetryPolicy,
}

impl RegistrationCycle {
    pub fn new(
        identity: ServiceIdentity,
        client: Arc<dyn ParentClient>,
        state: Arc<ConnectionState>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            identity,
            client,
            state,
            policy,
        }
    }

    /// Run until shutdown is requested.
    pub async fn run(self) {
        let mut phase = if self.state.is_connected() {
            Phase::Registered
        } else {
            Phase::Unregistered
        };

        tracing::info!(
            model_name = %self.identity.name(),
            model_port = self.identity.port(),
            interval = ?self.policy.interval,
            "Registration cycle starting"
        );

        while !self.state.is_shutdown_requested() {
            phase = self.step(phase).await;
        }

        tracing::info!("Registration cycle received shutdown signal, exiting loop");
    }

    /// Perform the single transition out of `phase`.
    pub async fn step(&self, phase: Phase) -> Phase {
        match phase {
            Phase::Unregistered => self.try_register().await,
            Phase::Registered => self.probe().await,
        }
    }

    /// One registration attempt. Waits one interval on failure.
    async fn try_register(&self) -> Phase {
        if self.state.is_shutdown_requested() {
            return Phase::Unregistered;
        }

        match self.client.register(&self.identity).await {
            Ok(()) => {
                self.state.set_connected(true);
                metrics::record_registration_attempt(true);
                metrics::set_parent_connected(true);
                tracing::info!(model_name = %self.identity.name(), "Registering to server succeeds");
                Phase::Registered
            }
            Err(e) => {
                metrics::record_registration_attempt(false);
                tracing::warn!(
                    error = %e,
                    retry_in = ?self.policy.interval,
                    "Registering to server fails, will retry"
                );
                self.state.shutdown().sleep(self.policy.interval).await;
                Phase::Unregistered
            }
        }
    }

    /// One liveness probe. Waits one interval on success, none on failure.
    async fn probe(&self) -> Phase {
        if self.state.is_shutdown_requested() {
            return Phase::Registered;
        }

        match self.client.ping().await {
            Ok(()) => {
                metrics::record_heartbeat_probe(true);
                tracing::debug!("Heartbeat acknowledged");
                self.state.shutdown().sleep(self.policy.interval).await;
                Phase::Registered
            }
            Err(e) => {
                self.state.set_connected(false);
                metrics::record_heartbeat_probe(false);
                metrics::set_parent_connected(false);
                tracing::warn!(
                    model_name = %self.identity.name(),
                    error = %e,
                    "Server is not responsive, retry registering"
                );
                Phase::Unregistered
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::client::ParentError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Register,
        Ping,
    }

    /// Parent whose answers are scripted; unscripted calls succeed.
    #[derive(Default)]
    struct ScriptedParent {
        register_results: Mutex<VecDeque<bool>>,
        ping_results: Mutex<VecDeque<bool>>,
        calls: Mutex<Vec<(Call, Instant)>>,
        connected_seen: Mutex<Vec<bool>>,
        shutdown_after: Mutex<Option<(usize, Arc<ConnectionState>)>>,
    }

    impl ScriptedParent {
        fn new(register: &[bool], ping: &[bool]) -> Self {
            Self {
                register_results: Mutex::new(register.iter().copied().collect()),
                ping_results: Mutex::new(ping.iter().copied().collect()),
                ..Default::default()
            }
        }

        fn shutdown_after(self, calls: usize, state: Arc<ConnectionState>) -> Self {
            *self.shutdown_after.lock().unwrap() = Some((calls, state));
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().iter().map(|(c, _)| *c).collect()
        }

        fn timed_calls(&self) -> Vec<(Call, Instant)> {
            self.calls.lock().unwrap().clone()
        }

        fn answer(&self, call: Call) -> Result<(), ParentError> {
            let ok = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((call, Instant::now()));
                let script = match call {
                    Call::Register => &self.register_results,
                    Call::Ping => &self.ping_results,
                };
                script.lock().unwrap().pop_front().unwrap_or(true)
            };

            if let Some((limit, state)) = self.shutdown_after.lock().unwrap().as_ref() {
                if self.calls.lock().unwrap().len() >= *limit {
                    self.connected_seen.lock().unwrap().push(state.is_connected());
                    state.request_shutdown();
                }
            }

            if ok {
                Ok(())
            } else {
                Err(ParentError::Status(503))
            }
        }
    }

    #[async_trait]
    impl ParentClient for ScriptedParent {
        async fn register(&self, _identity: &ServiceIdentity) -> Result<(), ParentError> {
            self.answer(Call::Register)
        }

        async fn ping(&self) -> Result<(), ParentError> {
            self.answer(Call::Ping)
        }
    }

    fn policy(interval_ms: u64) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(interval_ms),
            request_timeout: Duration::from_secs(1),
        }
    }

    fn cycle(parent: Arc<ScriptedParent>, state: Arc<ConnectionState>, interval_ms: u64) -> RegistrationCycle {
        RegistrationCycle::new(
            ServiceIdentity::new("digits", 8123),
            parent,
            state,
            policy(interval_ms),
        )
    }

    #[tokio::test]
    async fn test_registers_after_failures_then_probes() {
        let state = Arc::new(ConnectionState::new());
        let parent = Arc::new(
            ScriptedParent::new(&[false, false, false], &[]).shutdown_after(6, state.clone()),
        );

        tokio::time::timeout(Duration::from_secs(5), cycle(parent.clone(), state.clone(), 10).run())
            .await
            .expect("cycle should stop on shutdown");

        use Call::*;
        assert_eq!(parent.calls(), vec![Register, Register, Register, Register, Ping, Ping]);
        assert!(state.is_connected());
    }

    #[tokio::test]
    async fn test_probe_failure_returns_to_registration_without_waiting() {
        let state = Arc::new(ConnectionState::new());
        let parent = Arc::new(
            ScriptedParent::new(&[], &[true, true, true, true, true, false])
                .shutdown_after(8, state.clone()),
        );

        tokio::time::timeout(Duration::from_secs(5), cycle(parent.clone(), state.clone(), 200).run())
            .await
            .expect("cycle should stop on shutdown");

        use Call::*;
        let calls = parent.timed_calls();
        let kinds: Vec<_> = calls.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            kinds,
            vec![Register, Ping, Ping, Ping, Ping, Ping, Ping, Register]
        );

        // Re-registration follows the failed probe immediately.
        let gap = calls[7].1.duration_since(calls[6].1);
        assert!(gap < Duration::from_millis(150), "waited {gap:?} after failed probe");
        // Connected again after the second registration.
        assert_eq!(*parent.connected_seen.lock().unwrap(), vec![false]);
        assert!(state.is_connected());
    }

    #[tokio::test]
    async fn test_step_transitions() {
        let state = Arc::new(ConnectionState::new());
        let parent = Arc::new(ScriptedParent::new(&[false, true], &[true, false]));
        let cycle = cycle(parent, state.clone(), 1);

        assert_eq!(cycle.step(Phase::Unregistered).await, Phase::Unregistered);
        assert!(!state.is_connected());
        assert_eq!(cycle.step(Phase::Unregistered).await, Phase::Registered);
        assert!(state.is_connected());
        assert_eq!(cycle.step(Phase::Registered).await, Phase::Registered);
        assert!(state.is_connected());
        assert_eq!(cycle.step(Phase::Registered).await, Phase::Unregistered);
        assert!(!state.is_connected());
    }

    #[tokio::test]
    async fn test_shutdown_mid_retry_wait_exits_promptly() {
        let state = Arc::new(ConnectionState::new());
        let parent = Arc::new(ScriptedParent::new(&[false; 16], &[]));
        let task = tokio::spawn(cycle(parent.clone(), state.clone(), 30_000).run());

        tokio::time::sleep(Duration::from_millis(100)).await;
        let requested_at = Instant::now();
        state.request_shutdown();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("cycle must observe shutdown within a second")
            .unwrap();
        assert!(requested_at.elapsed() < Duration::from_secs(1));
        assert_eq!(parent.calls(), vec![Call::Register]);
    }

    #[tokio::test]
    async fn test_shutdown_mid_heartbeat_wait_exits_promptly() {
        let state = Arc::new(ConnectionState::new());
        let parent = Arc::new(ScriptedParent::new(&[], &[]));
        let task = tokio::spawn(cycle(parent.clone(), state.clone(), 30_000).run());

        tokio::time::sleep(Duration::from_millis(100)).await;
        state.request_shutdown();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("cycle must observe shutdown within a second")
            .unwrap();
        assert_eq!(parent.calls(), vec![Call::Register, Call::Ping]);
    }

    #[tokio::test]
    async fn test_no_calls_once_shutdown_requested() {
        let state = Arc::new(ConnectionState::new());
        state.request_shutdown();
        let parent = Arc::new(ScriptedParent::new(&[], &[]));

        cycle(parent.clone(), state.clone(), 10).run().await;
        assert!(parent.calls().is_empty());

        let cycle = cycle(parent.clone(), state, 10);
        cycle.step(Phase::Unregistered).await;
        cycle.step(Phase::Registered).await;
        assert!(parent.calls().is_empty());
    }
}
