//! Stand-in model shipped with the service template.
//!
//! Replace this with a real model: fetch or build supporting files in
//! `init`, run inference in `predict`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::model::{ImageFile, Model, ModelError};

/// Waits `init_delay` on startup, then answers every prediction with a
/// fixed result.
#[derive(Debug, Clone)]
pub struct PlaceholderModel {
    init_delay: Duration,
}

impl PlaceholderModel {
    pub fn new(init_delay: Duration) -> Self {
        Self { init_delay }
    }
}

#[async_trait]
impl Model for PlaceholderModel {
    async fn init(&self) {
        tracing::debug!(delay = ?self.init_delay, "Starting to wait");
        tokio::time::sleep(self.init_delay).await;
        tracing::debug!("Done waiting");
    }

    fn predict(&self, image: &ImageFile) -> Result<serde_json::Value, ModelError> {
        tracing::debug!(image = %image.name(), "Predicting");
        Ok(json!({ "someResultCategory": "actualResultValue" }))
    }
}
