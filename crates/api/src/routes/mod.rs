pub mod admin;
pub mod auth;
pub mod consultations;
pub mod depositions;
pub mod evidence;
pub mod health;
pub mod petitions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                              create account (public)
/// /auth/login                                 login (public)
///
/// /petitions                                  list, create draft
/// /petitions/{id}                             detail (visibility-gated)
/// /petitions/{id}/submit                      draft -> pending (creator)
/// /petitions/{id}/approve                     pending -> published (admin)
/// /petitions/{id}/reject                      pending -> rejected (admin)
/// /petitions/{id}/support                     join supporter set (citizen)
///
/// /evidence                                   list own (admin: all), register
/// /evidence/{id}/moderate                     verify/reject (admin)
///
/// /consultations/slots                        list, publish (lawyer)
/// /consultations/slots/{id}/book              book (citizen)
/// /consultations/bookings/{id}/confirm        confirm (owning lawyer)
///
/// /depositions                                list own, create
/// /depositions/{id}                           detail with ordered evidence
/// /depositions/{id}/evidence                  attach at position (author)
/// /depositions/{id}/evidence/{evidence_id}    detach (author)
///
/// /admin/users                                list accounts (admin)
/// /admin/users/{id}/role                      change role (admin, PATCH)
/// /admin/petitions/pending                    review queue (admin)
/// /admin/audit-logs                           filtered audit trail (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/petitions", petitions::router())
        .nest("/evidence", evidence::router())
        .nest("/consultations", consultations::router())
        .nest("/depositions", depositions::router())
        .nest("/admin", admin::router())
}
