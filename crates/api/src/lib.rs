pub mod auth;
pub mod routes;
pub mod state;

use axum::Router;

pub use state::AppState;

pub fn module_ready() -> bool {
    true
}

pub fn app(state: AppState) -> Router {
    routes::router(state)
}
