use axum::routing::{get, post};
use axum::Router;

use crate::handlers::consultations;
use crate::state::AppState;

/// Mount consultation routes (intended to be nested under `/consultations`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/slots",
            get(consultations::list_slots).post(consultations::publish_slot),
        )
        .route("/slots/{id}/book", post(consultations::book_slot))
        .route(
            "/bookings/{id}/confirm",
            post(consultations::confirm_booking),
        )
}
