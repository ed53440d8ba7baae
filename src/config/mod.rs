//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (NAME, PORT, SERVER_HOST, SERVER_PORT)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → identity / parent endpoint / retry policy handed to the core
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::ServiceConfig;
pub use schema::{
    CorsConfig, ModelConfig, ObservabilityConfig, ParentConfig, RegistrationConfig,
    ServiceSection,
};
