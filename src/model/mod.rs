//! Pluggable prediction model.
//!
//! The service only ever calls two things on a model: `init` once at
//! startup, and `predict` per request once the readiness flag is set.

pub mod image;
pub mod placeholder;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

pub use image::ImageFile;
pub use placeholder::PlaceholderModel;

/// Errors surfaced by the model layer.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model is not ready to receive predictions.")]
    NotReady,

    #[error("Invalid file name provided: [{0}]. Unable to find image on server.")]
    ImageNotFound(String),

    #[error("prediction failed: {0}")]
    Prediction(String),
}

/// A model the service can host.
#[async_trait]
pub trait Model: Send + Sync + 'static {
    /// Prepare supporting files. May take a long time; runs once in the
    /// background at startup.
    async fn init(&self);

    /// Produce a prediction for `image`. Called on the blocking pool.
    fn predict(&self, image: &ImageFile) -> Result<serde_json::Value, ModelError>;
}

/// Whether the model may serve predictions. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct ModelReadiness(Arc<AtomicBool>);

impl ModelReadiness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set_ready(&self, ready: bool) {
        self.0.store(ready, Ordering::SeqCst);
    }
}
