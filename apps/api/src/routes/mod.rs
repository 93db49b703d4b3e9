pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analysis/score", post(handlers::handle_score))
        .route("/api/v1/analysis/match", post(handlers::handle_match))
        .route("/api/v1/analysis/text", post(handlers::handle_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
