//! Route handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::http::response::{ApiError, PredictionBody, StatusBody};
use crate::http::server::AppState;
use crate::model::{ImageFile, ModelError};
use crate::observability::metrics;

/// `GET /`: liveness of this service itself.
pub async fn root() -> Json<[&'static str; 1]> {
    Json(["MLMicroserviceTemplate is Running!"])
}

/// `GET /status`: whether predictions can be made yet.
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusBody>, ApiError> {
    if !state.readiness.is_ready() {
        return Err(ModelError::NotReady.into());
    }

    Ok(Json(StatusBody {
        status: "success",
        detail: "Model ready to receive prediction requests.",
    }))
}

#[derive(Debug, Deserialize)]
pub struct PredictParams {
    #[serde(default)]
    pub filename: String,
}

/// `POST /predict?filename=`: run the model on an image from the images directory.
pub async fn predict(
    State(state): State<AppState>,
    Query(params): Query<PredictParams>,
) -> Result<Json<PredictionBody>, ApiError> {
    if !state.readiness.is_ready() {
        metrics::record_prediction("not_ready");
        return Err(ModelError::NotReady.into());
    }

    let image = match ImageFile::resolve(&state.images_dir, &params.filename) {
        Ok(image) => image,
        Err(e) => {
            tracing::debug!(filename = %params.filename, "Unable to open file");
            metrics::record_prediction("bad_request");
            return Err(e.into());
        }
    };

    let model = state.model.clone();
    let result = tokio::task::spawn_blocking(move || model.predict(&image)).await;

    match result {
        Ok(Ok(result)) => {
            metrics::record_prediction("success");
            Ok(Json(PredictionBody {
                status: "success",
                result,
            }))
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Prediction failed");
            metrics::record_prediction("error");
            Err(e.into())
        }
        Err(e) => {
            tracing::error!(error = %e, "Prediction task panicked");
            metrics::record_prediction("error");
            Err(e.into())
        }
    }
}
