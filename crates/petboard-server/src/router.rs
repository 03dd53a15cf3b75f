use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all petboard endpoints.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(handler::list_handler).post(handler::create_handler))
        .route("/adopt", post(handler::adopt_handler))
        .route("/delete", post(handler::delete_handler))
        .route("/edit", post(handler::edit_handler))
        .route("/health", get(handler::health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
