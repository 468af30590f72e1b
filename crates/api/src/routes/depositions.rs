use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::depositions;
use crate::state::AppState;

/// Mount deposition routes (intended to be nested under `/depositions`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(depositions::list).post(depositions::create))
        .route("/{id}", get(depositions::get))
        .route("/{id}/evidence", post(depositions::attach_evidence))
        .route(
            "/{id}/evidence/{evidence_id}",
            delete(depositions::detach_evidence),
        )
}
