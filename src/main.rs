//! Model Microservice (v1)
//!
//! Wraps a prediction model behind an HTTP interface and keeps itself
//! registered with a parent orchestrating server.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                MODEL SERVICE                 │
//!                         │                                              │
//!    Client Request       │  ┌─────────┐    ┌──────────┐    ┌─────────┐  │
//!    ─────────────────────┼─▶│  http   │───▶│ handlers │───▶│  model  │  │
//!                         │  │ server  │    │          │    │ predict │  │
//!                         │  └─────────┘    └──────────┘    └─────────┘  │
//!                         │                       │ readiness            │
//!                         │                       ▼                      │
//!                         │  ┌────────────────────────────────────────┐  │
//!                         │  │              lifecycle                 │  │
//!                         │  │  model init → registration cycle       │  │
//!                         │  │  signals → shutdown latch → drain      │  │
//!                         │  └───────────────────┬────────────────────┘  │
//!                         │                      │                       │
//!                         │  ┌───────────────────▼────────────────────┐  │   POST /model/register
//!                         │  │ registration: Unregistered ⇄ Registered├──┼──────────────────────▶ Parent
//!                         │  └────────────────────────────────────────┘  │   GET /                Server
//!                         └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use model_service::config::{load_config, load_from_env, ServiceConfig};
use model_service::http::{AppState, HttpServer};
use model_service::lifecycle::{signals, startup, LifecycleController};
use model_service::model::{Model, ModelReadiness, PlaceholderModel};
use model_service::observability::{logging, metrics};
use model_service::registration::HttpParentClient;
use model_service::ServiceError;

#[derive(Parser)]
#[command(name = "model-service")]
#[command(about = "Prediction model microservice", long_about = None)]
struct Args {
    /// TOML configuration file; defaults plus environment when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path).map_err(ServiceError::from)?,
        None => load_from_env().map_err(ServiceError::from)?,
    };

    logging::init_logging(&config.observability).map_err(ServiceError::from)?;

    tracing::info!("model-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        name = %config.service.name,
        port = config.service.port,
        parent = %config.parent_endpoint(),
        retry_interval_secs = config.registration.retry_interval_secs,
        "Configuration loaded"
    );

    run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run(config: ServiceConfig) -> Result<(), ServiceError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| ServiceError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(config.bind_address()).await?;

    let policy = config.retry_policy();
    let client = HttpParentClient::new(&config.parent_endpoint(), policy.request_timeout)?;
    let controller = Arc::new(LifecycleController::new(
        config.identity(),
        Arc::new(client),
        policy,
        Duration::from_secs(config.registration.shutdown_grace_secs),
    ));
    let shutdown = controller.shutdown_handle();

    let readiness = ModelReadiness::new();
    let model: Arc<dyn Model> = Arc::new(PlaceholderModel::new(Duration::from_secs(
        config.model.init_delay_secs,
    )));

    let init_task = startup::spawn_model_init(
        model.clone(),
        readiness.clone(),
        config.registration.enabled.then(|| controller.clone()),
    );

    let state = AppState::new(model, readiness.clone(), &config.model.images_dir);
    let server = HttpServer::new(&config, state);
    let mut server_task = tokio::spawn(server.run(listener, shutdown));

    let server_result = tokio::select! {
        _ = signals::shutdown_signal() => None,
        result = &mut server_task => Some(result),
    };

    readiness.set_ready(false);
    init_task.abort();
    controller.on_shutdown().await;

    let result = match server_result {
        Some(result) => result,
        None => server_task.await,
    };
    match result {
        Ok(served) => served?,
        Err(e) => tracing::error!(error = %e, "HTTP server task failed"),
    }

    Ok(())
}
