use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use reconcile::{logging::TracingRunLogWriter, run_once, RunSummary, SyncStats};
use serde::Serialize;
use tracing::{error, info_span, warn, Instrument};

use crate::{
    auth::{authorize_admin, AdminAuthError},
    state::AppState,
};

pub const SGP_SYNC_PATH: &str = "/admin/parlays/sgp/sync";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(SGP_SYNC_PATH, post(trigger_sgp_sync))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct SyncResponse {
    success: bool,
    message: String,
    stats: SyncStats,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    details: String,
}

fn error_response(status: StatusCode, error: &str, details: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: error.to_string(),
            details: details.into(),
        }),
    )
        .into_response()
}

async fn trigger_sgp_sync(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(err) = authorize_admin(&headers, state.admin_token()) {
        warn!(?err, "rejected single-game parlay sync trigger");
        return match err {
            AdminAuthError::MissingCredentials => error_response(
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "missing bearer token",
            ),
            AdminAuthError::Forbidden => error_response(
                StatusCode::FORBIDDEN,
                "Forbidden",
                "admin role required",
            ),
        };
    }

    let Ok(run_id) = state.start_run() else {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to sync single-game parlays",
            "run id overflow",
        );
    };

    let result = run_once(
        state.source(),
        state.engine(),
        state.stop_signal(),
        &mut TracingRunLogWriter,
    )
    .instrument(info_span!("sgp_sync", run_id))
    .await;

    match result {
        Ok(summary) => (
            StatusCode::OK,
            Json(SyncResponse {
                success: true,
                message: summary_message(&summary),
                stats: summary.stats,
            }),
        )
            .into_response(),
        Err(err) => {
            error!(run_id, error = %err, "single-game parlay sync failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to sync single-game parlays",
                err.to_string(),
            )
        }
    }
}

fn summary_message(summary: &RunSummary) -> String {
    let stats = summary.stats;
    let mut message = format!(
        "Synced single-game parlays for {} matches: {} created, {} skipped, {} errors",
        summary.matches_fetched, stats.created, stats.skipped, stats.errors
    );
    if summary.stopped_early {
        message.push_str(" (stopped early)");
    }
    message
}
