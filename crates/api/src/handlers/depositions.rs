//! Handlers for the deposition compiler: narrative documents with an
//! ordered evidence sequence.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rollon_core::error::CoreError;
use rollon_core::types::DbId;
use rollon_db::models::deposition::{CreateDeposition, Deposition, SequencedEvidence};
use rollon_db::repositories::{DepositionRepo, EvidenceRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::role_of;
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /depositions`.
#[derive(Debug, Deserialize)]
pub struct CreateDepositionRequest {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Request body for `POST /depositions/{id}/evidence`.
#[derive(Debug, Deserialize)]
pub struct AttachEvidenceRequest {
    pub evidence_id: DbId,
    pub position: i32,
}

/// Deposition detail with its ordered evidence sequence.
#[derive(Debug, Serialize)]
pub struct DepositionDetail {
    #[serde(flatten)]
    pub deposition: Deposition,
    pub evidence: Vec<SequencedEvidence>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/depositions
///
/// List the caller's own depositions.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Deposition>>> {
    let items = DepositionRepo::list_by_author(&state.pool, user.user_id).await?;
    Ok(Json(items))
}

/// POST /api/v1/depositions
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateDepositionRequest>,
) -> AppResult<(StatusCode, Json<Deposition>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must not be empty".into(),
        )));
    }

    let created = DepositionRepo::create(
        &state.pool,
        &CreateDeposition {
            author_id: user.user_id,
            title: input.title,
            content: input.content,
        },
    )
    .await?;

    tracing::info!(deposition_id = created.id, author_id = user.user_id, "Deposition created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/depositions/{id}
///
/// Deposition detail with the evidence sequence ordered by (position, id).
/// Visible to the author and admins only.
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DepositionDetail>> {
    let deposition = fetch_readable(&state, &user, id).await?;
    let evidence = DepositionRepo::list_sequence(&state.pool, id).await?;
    Ok(Json(DepositionDetail {
        deposition,
        evidence,
    }))
}

/// POST /api/v1/depositions/{id}/evidence
///
/// Author attaches evidence at a position. A duplicate (deposition,
/// evidence) pair answers 409.
pub async fn attach_evidence(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AttachEvidenceRequest>,
) -> AppResult<(StatusCode, Json<Vec<SequencedEvidence>>)> {
    if input.position < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Position must be non-negative".into(),
        )));
    }

    let deposition = fetch_owned(&state, &user, id).await?;

    if EvidenceRepo::find_by_id(&state.pool, input.evidence_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "evidence".into(),
            id: input.evidence_id,
        }));
    }

    DepositionRepo::attach_evidence(
        &state.pool,
        deposition.id,
        input.evidence_id,
        input.position,
        user.user_id,
    )
    .await?;

    let sequence = DepositionRepo::list_sequence(&state.pool, deposition.id).await?;
    tracing::info!(
        deposition_id = deposition.id,
        evidence_id = input.evidence_id,
        position = input.position,
        "Evidence attached to deposition"
    );
    Ok((StatusCode::CREATED, Json(sequence)))
}

/// DELETE /api/v1/depositions/{id}/evidence/{evidence_id}
pub async fn detach_evidence(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, evidence_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MessageResponse>> {
    let deposition = fetch_owned(&state, &user, id).await?;

    let removed = DepositionRepo::detach_evidence(&state.pool, deposition.id, evidence_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "deposition evidence".into(),
            id: evidence_id,
        }));
    }
    Ok(Json(MessageResponse::new("Evidence detached.")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a deposition readable by the caller (author or admin).
async fn fetch_readable(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> Result<Deposition, AppError> {
    let deposition = DepositionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if deposition.author_id != user.user_id && !role_of(user)?.is_admin() {
        return Err(not_found(id));
    }
    Ok(deposition)
}

/// Fetch a deposition the caller may mutate (author only).
async fn fetch_owned(state: &AppState, user: &AuthUser, id: DbId) -> Result<Deposition, AppError> {
    let deposition = DepositionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if deposition.author_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only modify your own depositions".into(),
        )));
    }
    Ok(deposition)
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "deposition".into(),
        id,
    })
}
