//! Handlers for the `/evidence` resource: registering uploaded artifacts
//! and admin moderation. The file bytes never pass through this service;
//! only the blob-store reference and the reported size are recorded.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rollon_core::error::CoreError;
use rollon_core::evidence::{self, VerificationStatus};
use rollon_core::types::DbId;
use rollon_db::models::evidence::{CreateEvidence, Evidence, ModerateEvidence};
use rollon_db::repositories::EvidenceRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::role_of;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /evidence`.
#[derive(Debug, Deserialize)]
pub struct RegisterEvidenceRequest {
    pub title: String,
    /// Blob-store reference to the uploaded file.
    pub file_path: String,
    pub file_type: String,
    #[serde(default)]
    pub size_bytes: Option<i64>,
    #[serde(default)]
    pub case_tag: Option<String>,
}

/// Request body for `POST /evidence/{id}/moderate`.
#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    /// `"verified"` or `"rejected"`.
    pub verification_status: String,
    #[serde(default)]
    pub rule_violation: Option<String>,
    #[serde(default)]
    pub party_involved: Option<String>,
    #[serde(default)]
    pub harm: Option<String>,
}

/// Query parameters for `GET /evidence`.
#[derive(Debug, Default, Deserialize)]
pub struct ListEvidenceQuery {
    /// Admin-only verification-status filter.
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/evidence
///
/// Citizens and lawyers list their own uploads; admins list everything,
/// optionally filtered by verification status.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListEvidenceQuery>,
) -> AppResult<Json<Vec<Evidence>>> {
    let role = role_of(&user)?;
    let items = if role.is_admin() {
        if let Some(ref status) = params.status {
            if VerificationStatus::parse(status).is_none() {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "Invalid verification status '{status}'"
                ))));
            }
        }
        EvidenceRepo::list_all(&state.pool, params.status.as_deref()).await?
    } else {
        EvidenceRepo::list_by_uploader(&state.pool, user.user_id).await?
    };
    Ok(Json(items))
}

/// POST /api/v1/evidence
///
/// Register an uploaded artifact against the caller's account.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<RegisterEvidenceRequest>,
) -> AppResult<(StatusCode, Json<Evidence>)> {
    evidence::validate_file_type(&input.file_type)?;
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must not be empty".into(),
        )));
    }

    let created = EvidenceRepo::create(
        &state.pool,
        &CreateEvidence {
            uploader_id: user.user_id,
            title: input.title,
            file_path: input.file_path,
            file_type: input.file_type,
            size_bytes: input.size_bytes,
            case_tag: input.case_tag,
        },
    )
    .await?;

    tracing::info!(
        evidence_id = created.id,
        uploader_id = user.user_id,
        file_type = %created.file_type,
        "Evidence registered"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/v1/evidence/{id}/moderate
///
/// Admin resolves an artifact to verified or rejected, optionally
/// annotating what was found.
pub async fn moderate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ModerateRequest>,
) -> AppResult<Json<Evidence>> {
    let role = role_of(&user)?;
    let target = VerificationStatus::parse(&input.verification_status).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Invalid verification status '{}'",
            input.verification_status
        )))
    })?;
    evidence::validate_moderation(role, target)?;

    let updated = EvidenceRepo::moderate(
        &state.pool,
        id,
        &ModerateEvidence {
            verification_status: target.as_str().to_string(),
            rule_violation: input.rule_violation,
            party_involved: input.party_involved,
            harm: input.harm,
        },
        user.user_id,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "evidence".into(),
            id,
        })
    })?;

    tracing::info!(
        evidence_id = updated.id,
        status = %updated.verification_status,
        "Evidence moderated"
    );
    Ok(Json(updated))
}
