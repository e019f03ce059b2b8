//! beedash - Bee Colony Impact Dashboards
//!
//! Loads the bee survey CSV once, summarizes it per dashboard and serves the
//! dashboards as interactive Plotly charts over HTTP.

mod charts;
mod config;
mod dashboard;
mod data;
mod logging;
mod server;

use anyhow::Context;
use config::AppConfig;
use dashboard::{catalog, Dashboard};
use data::DataLoader;
use server::AppState;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    logging::init(config.debug);

    let observations = DataLoader::new()
        .load_csv(&config.data_path)
        .with_context(|| format!("loading survey data from {}", config.data_path.display()))?;
    info!(
        path = %config.data_path.display(),
        rows = observations.height(),
        "survey data loaded"
    );

    let dashboards = catalog::all()
        .into_iter()
        .map(|spec| {
            let id = spec.id.clone();
            Dashboard::build(spec, &observations).with_context(|| format!("building dashboard {id}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let app = server::build_router(AppState::new(dashboards, config.debug));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "serving dashboards");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
