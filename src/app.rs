use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::healthz))
        .route("/api/audit", get(handlers::audit_query).post(handlers::audit))
        .route("/api/theme", get(handlers::get_theme).put(handlers::put_theme))
        .route("/api/theme/toggle", post(handlers::toggle_theme))
        .route("/api/theme/system", post(handlers::system_theme))
        .with_state(state)
}
