//! Handlers for the `/petitions` resource: drafting, review lifecycle, and
//! supporter accounting.
//!
//! Handlers fetch state, run the pure gates in `rollon_core::petition`, and
//! delegate mutation to `PetitionRepo`, which owns atomicity. The guarded
//! UPDATE in `PetitionRepo::transition` can return `None` when a concurrent
//! request won the transition; the handler then re-reads and answers with
//! the same soft no-op message a late sequential request would get.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rollon_core::audit::{
    ACTION_PETITION_CREATED, ACTION_PETITION_PUBLISHED, ACTION_PETITION_REJECTED,
    ACTION_PETITION_SUBMITTED,
};
use rollon_core::error::CoreError;
use rollon_core::petition::{self, PetitionStatus, ReviewDecision, Transition, Visibility};
use rollon_core::types::DbId;
use rollon_db::models::evidence::Evidence;
use rollon_db::models::petition::{CreatePetition, Petition};
use rollon_db::repositories::{EvidenceRepo, PetitionRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::role_of;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /petitions`.
#[derive(Debug, Deserialize)]
pub struct CreatePetitionRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    /// Evidence ids to attach; only the caller's own evidence is attached.
    #[serde(default)]
    pub evidence_ids: Vec<DbId>,
}

/// Petition detail with its attached evidence.
#[derive(Debug, Serialize)]
pub struct PetitionDetail {
    #[serde(flatten)]
    pub petition: Petition,
    pub evidence: Vec<Evidence>,
}

/// Response body for the support action.
#[derive(Debug, Serialize)]
pub struct SupportResponse {
    pub message: String,
    pub supporters: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/petitions
///
/// Visibility-filtered listing: published public petitions for everyone,
/// plus the caller's own; admins see all.
pub async fn list(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> AppResult<Json<Vec<Petition>>> {
    let viewer = match user {
        Some(ref u) => Some((u.user_id, role_of(u)?.is_admin())),
        None => None,
    };
    let petitions = PetitionRepo::list_visible(&state.pool, viewer).await?;
    Ok(Json(petitions))
}

/// POST /api/v1/petitions
///
/// Create a draft petition. Citizens only; the description must be at
/// least 50 characters.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreatePetitionRequest>,
) -> AppResult<(StatusCode, Json<Petition>)> {
    let role = role_of(&user)?;
    petition::validate_create(role, &input.description)?;

    let category = match input.category {
        Some(c) => {
            petition::validate_category(&c)?;
            c
        }
        None => "general".to_string(),
    };
    let visibility = match input.visibility.as_deref() {
        None => Visibility::Public,
        Some(v) => Visibility::parse(v).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("Invalid visibility '{v}'")))
        })?,
    };

    let created = PetitionRepo::create(
        &state.pool,
        &CreatePetition {
            creator_id: user.user_id,
            title: input.title,
            description: input.description,
            category,
            visibility: visibility.as_str().to_string(),
            evidence_ids: input.evidence_ids,
        },
        ACTION_PETITION_CREATED,
    )
    .await?;

    tracing::info!(petition_id = created.id, creator_id = user.user_id, "Petition drafted");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/petitions/{id}
///
/// Petition detail with attached evidence. Petitions the viewer may not
/// see answer 404, indistinguishable from absence.
pub async fn get(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<PetitionDetail>> {
    let found = PetitionRepo::find_by_id(&state.pool, id).await?;
    let Some(found) = found else {
        return Err(not_found(id));
    };

    let viewer = match user {
        Some(ref u) => Some((u.user_id, role_of(u)?)),
        None => None,
    };
    if !petition::is_visible_to(
        parse_status(&found.status)?,
        parse_visibility(&found.visibility)?,
        found.creator_id,
        viewer,
    ) {
        return Err(not_found(id));
    }

    let evidence = EvidenceRepo::list_for_petition(&state.pool, id).await?;
    Ok(Json(PetitionDetail {
        petition: found,
        evidence,
    }))
}

/// POST /api/v1/petitions/{id}/submit
///
/// Creator submits a draft for admin review. Already-submitted petitions
/// answer with a message instead of an error.
pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let role = role_of(&user)?;
    let found = PetitionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let status = parse_status(&found.status)?;

    match petition::submit_for_review(role, found.creator_id == user.user_id, status)? {
        Transition::AlreadyDone(message) => Ok(Json(MessageResponse::new(message))),
        Transition::Apply(target) => {
            let updated = PetitionRepo::transition(
                &state.pool,
                id,
                status,
                target,
                user.user_id,
                ACTION_PETITION_SUBMITTED,
                Utc::now(),
            )
            .await?;
            match updated {
                Some(p) => {
                    tracing::info!(petition_id = p.id, "Petition submitted for review");
                    Ok(Json(MessageResponse::new("Petition submitted for review.")))
                }
                // Lost the race; report where the petition actually is now.
                None => Ok(Json(stale_submit_message(&state, id).await?)),
            }
        }
    }
}

/// POST /api/v1/petitions/{id}/approve
///
/// Admin approves a pending petition, publishing it. `published_at` is set
/// exactly once even if the approval is repeated.
pub async fn approve(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    review(state, user, id, ReviewDecision::Approve).await
}

/// POST /api/v1/petitions/{id}/reject
///
/// Admin rejects a pending petition.
pub async fn reject(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    review(state, user, id, ReviewDecision::Reject).await
}

/// POST /api/v1/petitions/{id}/support
///
/// Add the caller to the supporter set. Idempotent; the count in the
/// response always matches the supporter-set cardinality.
pub async fn support(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<SupportResponse>> {
    let role = role_of(&user)?;
    petition::authorize_support(role)?;

    // The repo only sees published petitions, so drafts and rejected
    // petitions come back as absent here.
    let outcome = PetitionRepo::support(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let message = if outcome.newly_added {
        tracing::info!(
            petition_id = id,
            user_id = user.user_id,
            supporters = outcome.supporter_count,
            "Petition supported"
        );
        "You now support this petition.".to_string()
    } else {
        "You already support this petition.".to_string()
    };

    Ok(Json(SupportResponse {
        message,
        supporters: outcome.supporter_count,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Shared approve/reject flow.
async fn review(
    state: AppState,
    user: AuthUser,
    id: DbId,
    decision: ReviewDecision,
) -> AppResult<Json<MessageResponse>> {
    let role = role_of(&user)?;
    let found = PetitionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let status = parse_status(&found.status)?;

    match petition::review(role, decision, status)? {
        Transition::AlreadyDone(message) => Ok(Json(MessageResponse::new(message))),
        Transition::Apply(target) => {
            let action = match decision {
                ReviewDecision::Approve => ACTION_PETITION_PUBLISHED,
                ReviewDecision::Reject => ACTION_PETITION_REJECTED,
            };
            let updated = PetitionRepo::transition(
                &state.pool,
                id,
                status,
                target,
                user.user_id,
                action,
                Utc::now(),
            )
            .await?;
            match updated {
                Some(p) => {
                    tracing::info!(petition_id = p.id, status = %p.status, "Petition reviewed");
                    let message = match decision {
                        ReviewDecision::Approve => "Petition approved and published.",
                        ReviewDecision::Reject => "Petition rejected.",
                    };
                    Ok(Json(MessageResponse::new(message)))
                }
                // A concurrent review moved it out of pending first.
                None => Ok(Json(MessageResponse::new("Petition is not pending review."))),
            }
        }
    }
}

/// Re-read after a lost submit race and produce the "already" message the
/// current status warrants.
async fn stale_submit_message(state: &AppState, id: DbId) -> AppResult<MessageResponse> {
    let found = PetitionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(MessageResponse::new(format!(
        "Petition is already {}.",
        found.status
    )))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "petition".into(),
        id,
    })
}

fn parse_status(s: &str) -> Result<PetitionStatus, AppError> {
    PetitionStatus::parse(s).ok_or_else(|| {
        AppError::InternalError(format!("Unrecognized petition status '{s}' in database"))
    })
}

fn parse_visibility(s: &str) -> Result<Visibility, AppError> {
    Visibility::parse(s).ok_or_else(|| {
        AppError::InternalError(format!("Unrecognized visibility '{s}' in database"))
    })
}
