//! # agrocast-api: Axum Services
//!
//! The five agrocast HTTP services. Each runs as its own process; one
//! binary (`agrocast serve <service>`) picks the router by name.
//!
//! | Service | Port | Router |
//! |---------|------|--------|
//! | storage | 8000 | [`routes::storage`] |
//! | collector | 8001 | [`routes::collector`] |
//! | ml | 8002 | [`routes::ml`] |
//! | gateway | 8003 | [`routes::gateway`] |
//! | visualization | 8050 | [`routes::visualization`] |
//!
//! Every router gets the same tracing layer. Handlers delegate to
//! `agrocast-core`, `agrocast-store` and `agrocast-client`; errors leave
//! through [`AppError`].

pub mod config;
pub mod error;
pub mod extractors;
pub mod model;
pub mod routes;
pub mod state;
pub mod trace;

pub use config::{Service, ServiceConfig};
pub use error::AppError;

use std::net::SocketAddr;

use axum::Router;
use thiserror::Error;

use agrocast_client::{AgrocastClient, ClientError};
use agrocast_core::LayoutError;
use agrocast_store::{MeteoStore, StoreError};

use crate::model::ModelSlot;
use crate::state::{CollectorState, GatewayState, MlState, StorageState, VisualizationState};

/// Errors that stop a service from starting.
#[derive(Error, Debug)]
pub enum ServeError {
    /// The district index or data directory is unusable.
    #[error("storage: {0}")]
    Store(#[from] StoreError),

    /// The parameter layout file is invalid.
    #[error("layout: {0}")]
    Layout(#[from] LayoutError),

    /// The upstream HTTP client could not be built.
    #[error("client: {0}")]
    Client(#[from] ClientError),

    /// Binding or serving failed.
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// Wrap a service router with the shared middleware.
pub fn app(router: Router) -> Router {
    router.layer(trace::layer())
}

/// Build the router for the configured service.
pub fn build_router(config: &ServiceConfig) -> Result<Router, ServeError> {
    let router = match config.service {
        Service::Storage => {
            let store = MeteoStore::open(&config.data_dir)?;
            routes::storage::router(StorageState::new(store))
        }
        Service::Collector => {
            let layout = state::load_layout(&config.layout_path)?;
            let upstream = AgrocastClient::new(config.urls.clone())?;
            routes::collector::router(CollectorState::new(layout, upstream))
        }
        Service::Ml => routes::ml::router(MlState::new(ModelSlot::load(&config.model_path))),
        Service::Gateway => routes::gateway::router(GatewayState {
            upstream: AgrocastClient::new(config.urls.clone())?,
        }),
        Service::Visualization => {
            let upstream = AgrocastClient::new(config.urls.clone())?;
            routes::visualization::router(VisualizationState::new(upstream))
        }
    };
    Ok(app(router))
}

/// Run the configured service until Ctrl-C.
pub async fn serve(config: ServiceConfig) -> Result<(), ServeError> {
    let app = build_router(&config)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("{} service listening on {addr}", config.service);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("{} service stopped", config.service);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
