use axum::routing::{get, post};
use axum::Router;

use crate::handlers::evidence;
use crate::state::AppState;

/// Mount evidence routes (intended to be nested under `/evidence`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(evidence::list).post(evidence::create))
        .route("/{id}/moderate", post(evidence::moderate))
}
