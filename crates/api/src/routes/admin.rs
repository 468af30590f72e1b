use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Mount admin routes (intended to be nested under `/admin`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/role", patch(admin::update_user_role))
        .route("/petitions/pending", get(admin::pending_petitions))
        .route("/audit-logs", get(admin::audit_logs))
}
