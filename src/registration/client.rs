//! Outbound calls to the parent server.
//!
//! # Wire format
//! - Registration: `POST /model/register` with `{"modelName": .., "modelPort": ..}`
//! - Liveness probe: `GET /` with no body
//!
//! Any 2xx is success. Connection errors, timeouts and non-2xx statuses are
//! all reported as [`ParentError`] and treated as transient by the cycle.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time;
use url::Url;

use crate::registration::types::{ParentEndpoint, ServiceIdentity};

/// Transient failure talking to the parent.
#[derive(Debug, thiserror::Error)]
pub enum ParentError {
    #[error("invalid parent endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("parent responded with status {0}")]
    Status(u16),
}

/// The two calls the registration cycle makes.
#[async_trait]
pub trait ParentClient: Send + Sync {
    /// Announce `identity` to the parent.
    async fn register(&self, identity: &ServiceIdentity) -> Result<(), ParentError>;

    /// Check the parent is still reachable.
    async fn ping(&self) -> Result<(), ParentError>;
}

/// [`ParentClient`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpParentClient {
    client: reqwest::Client,
    register_url: Url,
    ping_url: Url,
    timeout: Duration,
}

impl HttpParentClient {
    /// Build a client for `endpoint`; every request is bounded by `timeout`.
    pub fn new(endpoint: &ParentEndpoint, timeout: Duration) -> Result<Self, ParentError> {
        let base = Url::parse(&endpoint.base_url())?;
        let register_url = base.join("/model/register")?;
        let ping_url = base.join("/")?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .user_agent(concat!("model-service/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ParentError::Client)?;

        Ok(Self {
            client,
            register_url,
            ping_url,
            timeout,
        })
    }

    pub fn register_url(&self) -> &Url {
        &self.register_url
    }

    pub fn ping_url(&self) -> &Url {
        &self.ping_url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(), ParentError> {
        let response = match time::timeout(self.timeout, request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => return Err(ParentError::Timeout(self.timeout)),
            Ok(Err(e)) => return Err(ParentError::Transport(e)),
            Err(_) => return Err(ParentError::Timeout(self.timeout)),
        };

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ParentError::Status(status.as_u16()))
        }
    }
}

#[async_trait]
impl ParentClient for HttpParentClient {
    async fn register(&self, identity: &ServiceIdentity) -> Result<(), ParentError> {
        let request = self
            .client
            .post(self.register_url.clone())
            .json(&identity.registration_request());
        self.send(request).await
    }

    async fn ping(&self) -> Result<(), ParentError> {
        self.send(self.client.get(self.ping_url.clone())).await
    }
}
