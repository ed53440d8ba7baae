//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::registration::{ParentEndpoint, RetryPolicy, ServiceIdentity};

/// Root configuration for the model service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// This service's own identity and listener.
    pub service: ServiceSection,

    /// The orchestrating server to register with.
    pub parent: ParentConfig,

    /// Registration / heartbeat cycle settings.
    pub registration: RegistrationConfig,

    /// Model settings.
    pub model: ModelConfig,

    /// Cross-origin settings for browser clients.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Name and port announced to the parent server.
    pub fn identity(&self) -> ServiceIdentity {
        ServiceIdentity::new(self.service.name.clone(), self.service.port)
    }

    pub fn parent_endpoint(&self) -> ParentEndpoint {
        ParentEndpoint::new(
            self.parent.scheme.clone(),
            self.parent.host.clone(),
            self.parent.port,
        )
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_secs(self.registration.retry_interval_secs),
            request_timeout: Duration::from_secs(self.registration.request_timeout_secs),
        }
    }

    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.bind_address, self.service.port)
    }
}

/// Service identity and listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSection {
    /// Name announced to the parent server.
    pub name: String,

    /// Port this service listens on (also announced to the parent).
    pub port: u16,

    /// Interface to bind (e.g., "0.0.0.0").
    pub bind_address: String,

    /// Upper bound on handling a single inbound request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            name: "model".to_string(),
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Parent server location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ParentConfig {
    /// URL scheme, "http" or "https".
    pub scheme: String,

    pub host: String,

    pub port: u16,
}

impl Default for ParentConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "host.docker.internal".to_string(),
            port: 5057,
        }
    }
}

/// Registration cycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Run the registration cycle at all.
    pub enabled: bool,

    /// Fixed wait between registration retries and between heartbeats.
    pub retry_interval_secs: u64,

    /// Timeout applied to every request sent to the parent.
    pub request_timeout_secs: u64,

    /// Extra time allowed on top of one interval when draining at shutdown.
    pub shutdown_grace_secs: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retry_interval_secs: 10,
            request_timeout_secs: 5,
            shutdown_grace_secs: 2,
        }
    }
}

/// Model configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory images are resolved against for `/predict`.
    pub images_dir: String,

    /// Simulated preparation time of the placeholder model.
    pub init_delay_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            images_dir: "src/images".to_string(),
            init_delay_secs: 10,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the service from a browser.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: [
                "http://localhost",
                "http://localhost:3000",
                "http://localhost:5057",
                "http://localhost:5000",
                "http://localhost:6379",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
