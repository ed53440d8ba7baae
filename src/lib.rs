//! Model Microservice Library
//!
//! Hosts a pluggable prediction model behind HTTP and keeps the service
//! registered with a parent orchestrating server.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod registration;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use http::HttpServer;
pub use lifecycle::{LifecycleController, Shutdown};
