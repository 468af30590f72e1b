use axum::routing::{get, post};
use axum::Router;

use crate::handlers::petitions;
use crate::state::AppState;

/// Mount petition routes (intended to be nested under `/petitions`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(petitions::list).post(petitions::create))
        .route("/{id}", get(petitions::get))
        .route("/{id}/submit", post(petitions::submit))
        .route("/{id}/approve", post(petitions::approve))
        .route("/{id}/reject", post(petitions::reject))
        .route("/{id}/support", post(petitions::support))
}
