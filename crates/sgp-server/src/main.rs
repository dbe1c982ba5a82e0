mod config;
mod wiring;

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use reconcile::SqliteParlayStore;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::Config::from_env()?;
    ensure_parent_dir(&config.db_path)?;
    let store = SqliteParlayStore::open(&config.db_path)?;
    let state = wiring::build_state(&config, Arc::new(store))?;
    if config.admin_token.is_none() {
        info!("SGP_ADMIN_TOKEN is not set; the sync trigger will reject every caller");
    }

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(
        addr = %config.listen_addr,
        source = %config.source_url,
        db = %config.db_path,
        "sgp server listening"
    );

    let stop = state.stop_signal().clone();
    axum::serve(listener, wiring::build_app(state))
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested, stopping in-flight parlay runs");
            stop.stop();
        })
        .await?;
    Ok(())
}

fn ensure_parent_dir(path: &str) -> Result<(), std::io::Error> {
    if let Some(parent) = Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
