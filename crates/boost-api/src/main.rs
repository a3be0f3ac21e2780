//! # boost-api — Binary Entry Point
//!
//! Resolves configuration, installs the Prometheus recorder and serves the
//! API on `0.0.0.0:<BOOST_PORT>`.

use anyhow::Context;
use boost_api::{AppConfig, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

/// Set to `json` for one JSON object per log line.
const LOG_FORMAT_VAR: &str = "BOOST_LOG_FORMAT";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_VAR).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env().context("failed to resolve configuration")?;
    tracing::info!(
        schema_root = %config.schema_root.display(),
        port = config.port,
        "configuration resolved"
    );

    let port = config.port;
    let mut state = AppState::new(config);
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => tracing::warn!(error = %e, "metrics recorder not installed; /metrics disabled"),
    }

    let app = boost_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "BOOST API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
