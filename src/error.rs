//! Errors that stop the service from starting.

use crate::config::ConfigError;
use crate::registration::ParentError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("metrics: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("parent client: {0}")]
    Parent(#[from] ParentError),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}
