//! Handlers for the consultation scheduler: lawyers publish availability
//! slots, citizens book them, and the owning lawyer confirms a booking.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rollon_core::consultation::{self, DEFAULT_DURATION_MINUTES};
use rollon_core::error::CoreError;
use rollon_core::types::{DbId, Timestamp};
use rollon_db::models::consultation::{
    BookingOutcome, ConfirmOutcome, ConsultationBooking, ConsultationSlot, CreateSlot,
};
use rollon_db::repositories::ConsultationRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::role_of;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::rbac::RequireLawyer;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /consultations/slots`.
#[derive(Debug, Deserialize)]
pub struct PublishSlotRequest {
    pub start_time: Timestamp,
    /// Defaults to 30 minutes when absent.
    #[serde(default)]
    pub duration_minutes: Option<i32>,
}

/// Slot representation with the derived end time.
#[derive(Debug, Serialize)]
pub struct SlotView {
    #[serde(flatten)]
    pub slot: ConsultationSlot,
    pub end_time: Timestamp,
}

impl From<ConsultationSlot> for SlotView {
    fn from(slot: ConsultationSlot) -> Self {
        let end_time = consultation::end_time(slot.start_time, slot.duration_minutes);
        SlotView { slot, end_time }
    }
}

/// Response body for the confirm action.
#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<ConsultationBooking>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/consultations/slots
///
/// Lawyers see their own slots, booked or not; everyone else (including
/// anonymous viewers) sees open slots across all lawyers.
pub async fn list_slots(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> AppResult<Json<Vec<SlotView>>> {
    let slots = match user {
        Some(ref u) if role_of(u)?.is_lawyer() => {
            ConsultationRepo::list_by_lawyer(&state.pool, u.user_id).await?
        }
        _ => ConsultationRepo::list_open(&state.pool).await?,
    };
    Ok(Json(slots.into_iter().map(SlotView::from).collect()))
}

/// POST /api/v1/consultations/slots
///
/// Lawyer publishes an availability slot. A duplicate (lawyer, start_time)
/// pair answers 409.
pub async fn publish_slot(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<PublishSlotRequest>,
) -> AppResult<(StatusCode, Json<SlotView>)> {
    let role = role_of(&user)?;
    let duration_minutes = input.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
    consultation::validate_publish_slot(role, duration_minutes)?;

    let slot = ConsultationRepo::create_slot(
        &state.pool,
        &CreateSlot {
            lawyer_id: user.user_id,
            start_time: input.start_time,
            duration_minutes,
        },
    )
    .await?;

    tracing::info!(slot_id = slot.id, lawyer_id = user.user_id, "Consultation slot published");
    Ok((StatusCode::CREATED, Json(slot.into())))
}

/// POST /api/v1/consultations/slots/{id}/book
///
/// Citizen books a slot. The booking stays unconfirmed until the lawyer
/// acts; a slot already confirmed-booked answers 409, as does a repeat
/// booking by the same citizen.
pub async fn book_slot(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<ConsultationBooking>)> {
    let role = role_of(&user)?;
    consultation::authorize_booking(role)?;

    let outcome = ConsultationRepo::book_slot(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "consultation slot".into(),
                id,
            })
        })?;

    match outcome {
        BookingOutcome::SlotUnavailable => Err(AppError::Core(CoreError::Conflict(
            "Slot is no longer available".into(),
        ))),
        BookingOutcome::Created(booking) => {
            tracing::info!(
                booking_id = booking.id,
                slot_id = id,
                user_id = user.user_id,
                "Consultation slot booked"
            );
            Ok((StatusCode::CREATED, Json(booking)))
        }
    }
}

/// POST /api/v1/consultations/bookings/{id}/confirm
///
/// The slot's lawyer confirms a booking, marking the slot booked in the
/// same transaction. Re-confirming is a soft no-op.
pub async fn confirm_booking(
    State(state): State<AppState>,
    RequireLawyer(user): RequireLawyer,
    Path(id): Path<DbId>,
) -> AppResult<Json<ConfirmResponse>> {
    let outcome = ConsultationRepo::confirm_booking(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "consultation booking".into(),
                id,
            })
        })?;

    match outcome {
        ConfirmOutcome::NotOwner => Err(AppError::Core(CoreError::Forbidden(
            "You can only confirm bookings on your own slots".into(),
        ))),
        ConfirmOutcome::AlreadyConfirmed => Ok(Json(ConfirmResponse {
            message: "Booking is already confirmed.".into(),
            booking: None,
        })),
        ConfirmOutcome::Confirmed(booking) => {
            tracing::info!(booking_id = booking.id, lawyer_id = user.user_id, "Booking confirmed");
            Ok(Json(ConfirmResponse {
                message: "Booking confirmed.".into(),
                booking: Some(booking),
            }))
        }
    }
}
