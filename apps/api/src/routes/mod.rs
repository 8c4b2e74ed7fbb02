pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(handlers::handle_index))
        .route("/submit", post(handlers::handle_submit))
        .route("/uploads/:filename", get(handlers::handle_download))
        .route("/admin", get(handlers::handle_admin))
        .layer(body_limit)
        .with_state(state)
}
