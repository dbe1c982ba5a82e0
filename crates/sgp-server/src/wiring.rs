use std::sync::Arc;

use api::AppState;
use axum::{routing::get, Router};
use reconcile::{HttpMarketSource, ParlayStore, SourceError, SyncEngine, SyncOptions};

use crate::config::Config;

pub fn build_state(
    config: &Config,
    store: Arc<dyn ParlayStore>,
) -> Result<AppState, SourceError> {
    let source = HttpMarketSource::new(config.source_url.as_str(), config.source_timeout)?;
    let engine = SyncEngine::new(
        store,
        SyncOptions {
            run_budget: config.run_budget,
        },
    );

    Ok(AppState::new(
        Arc::new(source),
        Arc::new(engine),
        config.admin_token.clone(),
    ))
}

pub fn build_app(state: AppState) -> Router {
    debug_assert!(parlay::module_ready());
    debug_assert!(reconcile::module_ready());
    debug_assert!(api::module_ready());

    api::app(state).route("/health", get(healthcheck))
}

async fn healthcheck() -> &'static str {
    "ok"
}
