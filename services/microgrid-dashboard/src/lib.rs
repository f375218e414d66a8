//! Microgrid dashboard - views over a solar, wind and battery monitoring backend
//!
//! Fetches backend resources, falls back to fixed sample data when reads fail,
//! and keeps per-page collections in sync with create, update and delete calls.

pub mod api;
pub mod chart;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod fallback;
pub mod io;
pub mod model;
pub mod pages;
pub mod pagination;
pub mod render;
pub mod samples;
pub mod settings;
pub mod stats;
pub mod store;
pub mod validation;
pub mod view;

pub use config::{load_config, Config};
pub use error::{DashboardError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::io::ReqwestHttpClient;
use crate::settings::SettingsStore;
use crate::view::AppState;

/// API client over the real HTTP transport
pub fn connect(config: &Config) -> ApiClient {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    ApiClient::new(http, config.backend.base_url.clone())
}

/// Mount every page and serve the views until ctrl-c
pub async fn run(config: Config) -> Result<()> {
    config.validate()?;

    let api = connect(&config);
    let settings = SettingsStore::open(config.settings_path.clone())?;
    let view_server = config.view_server.clone();
    let cancel = CancellationToken::new();

    let app = Arc::new(AppState::new(config, api, settings));
    app.mount().await;
    tracing::info!("Pages mounted");

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
        cancel_for_signal.cancel();
    });

    let served = if view_server.enabled {
        serve(Arc::clone(&app), view_server.port, cancel.clone()).await
    } else {
        tracing::info!("View server disabled, waiting for shutdown");
        cancel.cancelled().await;
        Ok(())
    };

    app.teardown().await;
    tracing::info!("Microgrid dashboard stopped");
    served
}

async fn serve(app: view::AppHandle, port: u16, cancel: CancellationToken) -> Result<()> {
    let router = view::build_router(app);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        DashboardError::Dashboard(format!("Failed to bind view server to port {}: {}", port, e))
    })?;
    tracing::info!("View server listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await
        .map_err(|e| DashboardError::Dashboard(format!("View server failed: {}", e)))?;

    tracing::debug!("View server stopped");
    Ok(())
}
