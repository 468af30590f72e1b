//! Admin-only handlers: account management, the petition review queue, and
//! the audit log query endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;
use rollon_core::error::CoreError;
use rollon_core::roles::Role;
use rollon_core::types::DbId;
use rollon_db::models::audit::{AuditLogPage, AuditQuery};
use rollon_db::models::petition::Petition;
use rollon_db::models::user::UserResponse;
use rollon_db::repositories::{AuditLogRepo, PetitionRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for `PATCH /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PATCH /api/v1/admin/users/{id}/role
///
/// Change an account's role. Audited with the acting admin as actor.
pub async fn update_user_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    let role = Role::parse(&input.role).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Invalid role '{}'",
            input.role
        )))
    })?;

    let updated = UserRepo::update_role(&state.pool, id, role.as_str(), admin.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "user".into(),
                id,
            })
        })?;

    tracing::info!(user_id = updated.id, role = %updated.role, "User role changed");
    Ok(Json(updated.into()))
}

/// GET /api/v1/admin/petitions/pending
///
/// The review queue, oldest first.
pub async fn pending_petitions(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<Petition>>> {
    let petitions = PetitionRepo::list_pending(&state.pool).await?;
    Ok(Json(petitions))
}

/// GET /api/v1/admin/audit-logs
///
/// Filterable, paginated audit trail.
pub async fn audit_logs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AuditQuery>,
) -> AppResult<Json<AuditLogPage>> {
    let page = AuditLogRepo::query(&state.pool, &params).await?;
    Ok(Json(page))
}
