//! Startup orchestration.
//!
//! Model initialization may take a long time, so it runs in the background
//! and never delays the HTTP listener. Registration only begins once the
//! model is ready.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::lifecycle::LifecycleController;
use crate::model::{Model, ModelReadiness};

/// Initialize `model` in the background, flip `readiness`, then start the
/// registration cycle through `controller` (if any).
pub fn spawn_model_init(
    model: Arc<dyn Model>,
    readiness: ModelReadiness,
    controller: Option<Arc<LifecycleController>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("Beginning model initialization process");
        model.init().await;

        if let Some(controller) = &controller {
            if controller.state().is_shutdown_requested() {
                tracing::info!("Shutdown requested during model initialization");
                return;
            }
        }

        readiness.set_ready(true);
        tracing::info!("Finishing model initialization process");

        match controller {
            Some(controller) => {
                controller.on_startup();
            }
            None => tracing::info!("Registration disabled, not contacting parent server"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageFile, ModelError};
    use crate::registration::{ParentClient, ParentError, RetryPolicy, ServiceIdentity};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct InstantModel;

    #[async_trait]
    impl Model for InstantModel {
        async fn init(&self) {}

        fn predict(&self, _image: &ImageFile) -> Result<serde_json::Value, ModelError> {
            Ok(serde_json::Value::Null)
        }
    }

    #[derive(Default)]
    struct CountingParent {
        registers: AtomicUsize,
    }

    #[async_trait]
    impl ParentClient for CountingParent {
        async fn register(&self, _identity: &ServiceIdentity) -> Result<(), ParentError> {
            self.registers.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn ping(&self) -> Result<(), ParentError> {
            Ok(())
        }
    }

    fn controller(parent: Arc<CountingParent>) -> Arc<LifecycleController> {
        Arc::new(LifecycleController::new(
            ServiceIdentity::new("digits", 8123),
            parent,
            RetryPolicy {
                interval: Duration::from_secs(30),
                request_timeout: Duration::from_secs(1),
            },
            Duration::from_millis(500),
        ))
    }

    #[tokio::test]
    async fn test_ready_then_registers() {
        let parent = Arc::new(CountingParent::default());
        let controller = controller(parent.clone());
        let readiness = ModelReadiness::new();

        spawn_model_init(Arc::new(InstantModel), readiness.clone(), Some(controller.clone()))
            .await
            .unwrap();
        assert!(readiness.is_ready());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(parent.registers.load(Ordering::SeqCst), 1);
        controller.on_shutdown().await;
    }

    #[tokio::test]
    async fn test_without_controller_only_sets_readiness() {
        let readiness = ModelReadiness::new();
        spawn_model_init(Arc::new(InstantModel), readiness.clone(), None)
            .await
            .unwrap();
        assert!(readiness.is_ready());
    }

    #[tokio::test]
    async fn test_shutdown_during_init_skips_registration() {
        let parent = Arc::new(CountingParent::default());
        let controller = controller(parent.clone());
        controller.on_shutdown().await;

        let readiness = ModelReadiness::new();
        spawn_model_init(Arc::new(InstantModel), readiness.clone(), Some(controller))
            .await
            .unwrap();
        assert!(!readiness.is_ready());
        assert_eq!(parent.registers.load(Ordering::SeqCst), 0);
    }
}
