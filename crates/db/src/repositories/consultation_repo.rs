//! Repository for consultation slots and bookings.
//!
//! Booking and confirmation are the two check-and-set operations in this
//! table pair; both lock the slot row so concurrent citizens cannot pass
//! the same availability check.

use rollon_core::audit::{ACTION_BOOKING_CONFIRMED, ACTION_SLOT_BOOKED, ACTION_SLOT_PUBLISHED};
use rollon_core::types::DbId;
use sqlx::PgPool;

use crate::models::audit::CreateAuditLog;
use crate::models::consultation::{
    BookingOutcome, ConfirmOutcome, ConsultationBooking, ConsultationSlot, CreateSlot,
};
use crate::repositories::AuditLogRepo;

/// Column list for `consultation_slots`.
const SLOT_COLUMNS: &str = "id, lawyer_id, start_time, duration_minutes, is_booked, created_at";

/// Column list for `consultation_bookings`.
const BOOKING_COLUMNS: &str = "id, slot_id, user_id, confirmed, created_at";

/// Provides slot publication, booking, and confirmation.
pub struct ConsultationRepo;

impl ConsultationRepo {
    /// Publish an availability slot. A duplicate (lawyer, start_time) pair
    /// violates `uq_consultation_slots_lawyer_start` and surfaces as a
    /// conflict. Audited in the same transaction.
    pub async fn create_slot(
        pool: &PgPool,
        input: &CreateSlot,
    ) -> Result<ConsultationSlot, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO consultation_slots (lawyer_id, start_time, duration_minutes)
             VALUES ($1, $2, $3)
             RETURNING {SLOT_COLUMNS}"
        );
        let slot = sqlx::query_as::<_, ConsultationSlot>(&query)
            .bind(input.lawyer_id)
            .bind(input.start_time)
            .bind(input.duration_minutes)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::create(
            &mut *tx,
            &CreateAuditLog {
                actor_id: Some(input.lawyer_id),
                action: ACTION_SLOT_PUBLISHED.to_string(),
                entity_type: Some("consultation_slot".into()),
                entity_id: Some(slot.id),
                context: Some(serde_json::json!({
                    "start_time": slot.start_time,
                    "duration_minutes": slot.duration_minutes,
                })),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(slot)
    }

    /// Find a slot by internal ID.
    pub async fn find_slot_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ConsultationSlot>, sqlx::Error> {
        let query = format!("SELECT {SLOT_COLUMNS} FROM consultation_slots WHERE id = $1");
        sqlx::query_as::<_, ConsultationSlot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a lawyer's own slots, booked or not, soonest first.
    pub async fn list_by_lawyer(
        pool: &PgPool,
        lawyer_id: DbId,
    ) -> Result<Vec<ConsultationSlot>, sqlx::Error> {
        let query = format!(
            "SELECT {SLOT_COLUMNS} FROM consultation_slots
             WHERE lawyer_id = $1 ORDER BY start_time ASC"
        );
        sqlx::query_as::<_, ConsultationSlot>(&query)
            .bind(lawyer_id)
            .fetch_all(pool)
            .await
    }

    /// List open (unbooked) slots across all lawyers, soonest first.
    pub async fn list_open(pool: &PgPool) -> Result<Vec<ConsultationSlot>, sqlx::Error> {
        let query = format!(
            "SELECT {SLOT_COLUMNS} FROM consultation_slots
             WHERE is_booked = false ORDER BY start_time ASC"
        );
        sqlx::query_as::<_, ConsultationSlot>(&query)
            .fetch_all(pool)
            .await
    }

    /// Book a slot for a citizen.
    ///
    /// Locks the slot row, re-checks `is_booked` under the lock, then
    /// inserts the booking. A repeat booking by the same user violates
    /// `uq_consultation_bookings_slot_user` and propagates as a conflict.
    /// Booking does NOT flip `is_booked`; that happens at confirmation.
    /// Returns `None` if the slot does not exist.
    pub async fn book_slot(
        pool: &PgPool,
        slot_id: DbId,
        user_id: DbId,
    ) -> Result<Option<BookingOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let slot: Option<(bool,)> =
            sqlx::query_as("SELECT is_booked FROM consultation_slots WHERE id = $1 FOR UPDATE")
                .bind(slot_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((is_booked,)) = slot else {
            return Ok(None);
        };
        if is_booked {
            return Ok(Some(BookingOutcome::SlotUnavailable));
        }

        let query = format!(
            "INSERT INTO consultation_bookings (slot_id, user_id)
             VALUES ($1, $2)
             RETURNING {BOOKING_COLUMNS}"
        );
        let booking = sqlx::query_as::<_, ConsultationBooking>(&query)
            .bind(slot_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::create(
            &mut *tx,
            &CreateAuditLog {
                actor_id: Some(user_id),
                action: ACTION_SLOT_BOOKED.to_string(),
                entity_type: Some("consultation_booking".into()),
                entity_id: Some(booking.id),
                context: Some(serde_json::json!({ "slot_id": slot_id })),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(BookingOutcome::Created(booking)))
    }

    /// Confirm a booking as the owning lawyer: sets `confirmed = true` and
    /// marks the slot booked, in one transaction under the slot lock.
    /// Returns `None` if the booking does not exist.
    pub async fn confirm_booking(
        pool: &PgPool,
        booking_id: DbId,
        lawyer_id: DbId,
    ) -> Result<Option<ConfirmOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(DbId, DbId, bool)> = sqlx::query_as(
            "SELECT b.slot_id, s.lawyer_id, b.confirmed
             FROM consultation_bookings b
             JOIN consultation_slots s ON s.id = b.slot_id
             WHERE b.id = $1
             FOR UPDATE OF b, s",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((slot_id, owner_id, confirmed)) = row else {
            return Ok(None);
        };
        if owner_id != lawyer_id {
            return Ok(Some(ConfirmOutcome::NotOwner));
        }
        if confirmed {
            return Ok(Some(ConfirmOutcome::AlreadyConfirmed));
        }

        let query = format!(
            "UPDATE consultation_bookings SET confirmed = true
             WHERE id = $1
             RETURNING {BOOKING_COLUMNS}"
        );
        let booking = sqlx::query_as::<_, ConsultationBooking>(&query)
            .bind(booking_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE consultation_slots SET is_booked = true WHERE id = $1")
            .bind(slot_id)
            .execute(&mut *tx)
            .await?;

        AuditLogRepo::create(
            &mut *tx,
            &CreateAuditLog {
                actor_id: Some(lawyer_id),
                action: ACTION_BOOKING_CONFIRMED.to_string(),
                entity_type: Some("consultation_booking".into()),
                entity_id: Some(booking.id),
                context: Some(serde_json::json!({ "slot_id": slot_id })),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(ConfirmOutcome::Confirmed(booking)))
    }

    /// List bookings for a slot, oldest first.
    pub async fn list_bookings_for_slot(
        pool: &PgPool,
        slot_id: DbId,
    ) -> Result<Vec<ConsultationBooking>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM consultation_bookings
             WHERE slot_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, ConsultationBooking>(&query)
            .bind(slot_id)
            .fetch_all(pool)
            .await
    }
}
