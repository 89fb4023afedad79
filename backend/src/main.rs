use backend::api::{self, AppState};
use backend::config::ServerConfig;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uci_engine::{EngineLocator, EngineRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;

    let locator = EngineLocator::new(config.engine.clone());
    let status = locator.status();
    if status.available {
        info!(path = %status.path.display(), "Engine found");
    } else {
        warn!(
            path = %status.path.display(),
            download = %status.download_url,
            "Engine not found; analysis requests will fail until it is installed"
        );
    }

    let state = AppState::new(EngineRunner::new(locator), config.max_sessions);
    let app = api::router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, max_sessions = ?config.max_sessions, "API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
