//! Immutable inputs of the registration cycle.

use std::time::Duration;

use serde::Serialize;

/// Name and port this service announces to its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    name: String,
    port: u16,
}

impl ServiceIdentity {
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Body of `POST /model/register`.
    pub fn registration_request(&self) -> RegistrationRequest<'_> {
        RegistrationRequest {
            model_name: &self.name,
            model_port: self.port,
        }
    }
}

/// Wire format the parent server expects on registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest<'a> {
    pub model_name: &'a str,
    pub model_port: u16,
}

/// Location of the orchestrating server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentEndpoint {
    scheme: String,
    host: String,
    port: u16,
}

impl ParentEndpoint {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// Plain-HTTP endpoint, the common case.
    pub fn http(host: impl Into<String>, port: u16) -> Self {
        Self::new("http", host, port)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// e.g. `http://host.docker.internal:5057`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl std::fmt::Display for ParentEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base_url())
    }
}

/// Fixed-interval retry settings, with no backoff and no attempt limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait between registration attempts and between heartbeats.
    pub interval: Duration,

    /// Upper bound on any single call to the parent.
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            request_timeout: Duration::from_secs(5),
        }
    }
}
