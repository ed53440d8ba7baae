//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, ports valid)
//! - Validate enumerated string settings (scheme, log format)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service.name.trim().is_empty() {
        errors.push(ValidationError::new("service.name", "must not be empty"));
    }
    if config.service.port == 0 {
        errors.push(ValidationError::new("service.port", "must be between 1 and 65535"));
    }
    if config.service.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "service.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.parent.host.trim().is_empty() {
        errors.push(ValidationError::new("parent.host", "must not be empty"));
    }
    if config.parent.port == 0 {
        errors.push(ValidationError::new("parent.port", "must be between 1 and 65535"));
    }
    if !matches!(config.parent.scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::new(
            "parent.scheme",
            format!("unsupported scheme '{}'", config.parent.scheme),
        ));
    }

    if config.registration.retry_interval_secs == 0 {
        errors.push(ValidationError::new(
            "registration.retry_interval_secs",
            "must be greater than zero",
        ));
    }
    if config.registration.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "registration.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.model.images_dir.trim().is_empty() {
        errors.push(ValidationError::new("model.images_dir", "must not be empty"));
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected 'pretty' or 'json', got '{}'", config.observability.log_format),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
