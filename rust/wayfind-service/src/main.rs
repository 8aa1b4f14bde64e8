use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, EnvFilter};
use wayfind_core::{BeaconRepository, EngineOptions, InMemoryBeaconRepository};
use wayfind_service::{build_router, db::SqliteBeaconRepository, AppState, Config, EngineState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cfg = Config::from_env()?;
    let options = EngineOptions::default();
    let engine = EngineState::load(cfg.layout_path.as_deref(), options.clone(), cfg.path_cache)?;
    let beacons: Arc<dyn BeaconRepository> = match &cfg.beacon_db {
        Some(path) => Arc::new(SqliteBeaconRepository::open(path)?),
        None => Arc::new(InMemoryBeaconRepository::new()),
    };
    let app = build_router(AppState::new(engine, beacons, options));

    let addr = cfg.addr();
    tracing::info!(core_version = %wayfind_core::version(), addr = %addr, "starting wayfind-service");
    let listener = tokio::net::TcpListener::bind(&addr).await.with_context(|| format!("bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
