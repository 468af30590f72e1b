//! Consultation slot and booking models.

use rollon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A lawyer-published availability slot. `end_time` is derived
/// (`rollon_core::consultation::end_time`), never stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConsultationSlot {
    pub id: DbId,
    pub lawyer_id: DbId,
    pub start_time: Timestamp,
    pub duration_minutes: i32,
    pub is_booked: bool,
    pub created_at: Timestamp,
}

/// DTO for publishing a slot.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlot {
    pub lawyer_id: DbId,
    pub start_time: Timestamp,
    pub duration_minutes: i32,
}

/// A citizen's booking of a slot. `confirmed` flips only through the
/// owning lawyer's confirm action, which also marks the slot booked.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConsultationBooking {
    pub id: DbId,
    pub slot_id: DbId,
    pub user_id: DbId,
    pub confirmed: bool,
    pub created_at: Timestamp,
}

/// Outcome of the transactional booking operation.
#[derive(Debug)]
pub enum BookingOutcome {
    /// Slot created the booking; remains unconfirmed until the lawyer acts.
    Created(ConsultationBooking),
    /// The slot already carries a confirmed booking.
    SlotUnavailable,
}

/// Outcome of the lawyer confirming a booking.
#[derive(Debug)]
pub enum ConfirmOutcome {
    /// Booking confirmed and slot marked booked, atomically.
    Confirmed(ConsultationBooking),
    /// The acting lawyer does not own the slot.
    NotOwner,
    /// Already confirmed earlier; nothing was mutated.
    AlreadyConfirmed,
}
