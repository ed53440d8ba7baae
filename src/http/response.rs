//! Response bodies and error mapping.
//!
//! Every response is JSON. Failures carry `{"status": "failure", "detail": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::model::ModelError;

/// Body of a failed request.
#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub status: &'static str,
    pub detail: String,
}

/// Body of a successful `/status` call.
#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub detail: &'static str,
}

/// Body of a successful prediction.
#[derive(Debug, Serialize)]
pub struct PredictionBody {
    pub status: &'static str,
    pub result: serde_json::Value,
}

/// Errors returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("prediction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Model(ModelError::NotReady) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Model(ModelError::ImageNotFound(_)) => StatusCode::BAD_REQUEST,
            ApiError::Model(ModelError::Prediction(_)) | ApiError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = FailureBody {
            status: "failure",
            detail: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
