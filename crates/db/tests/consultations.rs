//! Integration tests for consultation slot publication, booking under a
//! row lock, and confirmation.

mod common;

use chrono::{TimeZone, Utc};
use common::create_user;
use rollon_db::models::consultation::{BookingOutcome, ConfirmOutcome, CreateSlot};
use rollon_db::repositories::ConsultationRepo;
use sqlx::PgPool;

fn slot_at(lawyer_id: i64, hour: u32) -> CreateSlot {
    CreateSlot {
        lawyer_id,
        start_time: Utc.with_ymd_and_hms(2026, 9, 1, hour, 0, 0).unwrap(),
        duration_minutes: 30,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slot_time_violates_unique_constraint(pool: PgPool) {
    let lawyer = create_user(&pool, "lawyer1", "lawyer").await;

    ConsultationRepo::create_slot(&pool, &slot_at(lawyer.id, 10))
        .await
        .expect("first slot should succeed");
    let err = ConsultationRepo::create_slot(&pool, &slot_at(lawyer.id, 10))
        .await
        .expect_err("duplicate (lawyer, start_time) must fail");

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(
                db_err.constraint(),
                Some("uq_consultation_slots_lawyer_start")
            );
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_book_creates_unconfirmed_booking(pool: PgPool) {
    let lawyer = create_user(&pool, "lawyer2", "lawyer").await;
    let citizen = create_user(&pool, "citizen2", "citizen").await;
    let slot = ConsultationRepo::create_slot(&pool, &slot_at(lawyer.id, 11))
        .await
        .expect("slot creation should succeed");

    let outcome = ConsultationRepo::book_slot(&pool, slot.id, citizen.id)
        .await
        .expect("booking should succeed")
        .expect("slot exists");

    let booking = match outcome {
        BookingOutcome::Created(b) => b,
        BookingOutcome::SlotUnavailable => panic!("open slot must be bookable"),
    };
    assert!(!booking.confirmed);

    // Booking alone does not flip is_booked.
    let refreshed = ConsultationRepo::find_slot_by_id(&pool, slot.id)
        .await
        .expect("lookup should succeed")
        .expect("slot exists");
    assert!(!refreshed.is_booked);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_same_citizen_cannot_book_twice(pool: PgPool) {
    let lawyer = create_user(&pool, "lawyer3", "lawyer").await;
    let citizen = create_user(&pool, "citizen3", "citizen").await;
    let slot = ConsultationRepo::create_slot(&pool, &slot_at(lawyer.id, 12))
        .await
        .expect("slot creation should succeed");

    ConsultationRepo::book_slot(&pool, slot.id, citizen.id)
        .await
        .expect("first booking should succeed");
    let err = ConsultationRepo::book_slot(&pool, slot.id, citizen.id)
        .await
        .expect_err("repeat booking must violate the unique constraint");

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_consultation_bookings_slot_user"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_two_citizens_two_slots_both_succeed(pool: PgPool) {
    let lawyer = create_user(&pool, "lawyer4", "lawyer").await;
    let alice = create_user(&pool, "alice4", "citizen").await;
    let bob = create_user(&pool, "bob4", "citizen").await;

    let slot_a = ConsultationRepo::create_slot(&pool, &slot_at(lawyer.id, 9))
        .await
        .expect("slot creation should succeed");
    let slot_b = ConsultationRepo::create_slot(&pool, &slot_at(lawyer.id, 14))
        .await
        .expect("slot creation should succeed");

    let (a, b) = tokio::join!(
        ConsultationRepo::book_slot(&pool, slot_a.id, alice.id),
        ConsultationRepo::book_slot(&pool, slot_b.id, bob.id),
    );
    assert!(matches!(
        a.expect("booking should succeed"),
        Some(BookingOutcome::Created(_))
    ));
    assert!(matches!(
        b.expect("booking should succeed"),
        Some(BookingOutcome::Created(_))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirm_flips_slot_and_is_owner_gated(pool: PgPool) {
    let owner = create_user(&pool, "owner5", "lawyer").await;
    let other_lawyer = create_user(&pool, "other5", "lawyer").await;
    let citizen = create_user(&pool, "citizen5", "citizen").await;

    let slot = ConsultationRepo::create_slot(&pool, &slot_at(owner.id, 15))
        .await
        .expect("slot creation should succeed");
    let booking = match ConsultationRepo::book_slot(&pool, slot.id, citizen.id)
        .await
        .expect("booking should succeed")
        .expect("slot exists")
    {
        BookingOutcome::Created(b) => b,
        BookingOutcome::SlotUnavailable => panic!("open slot must be bookable"),
    };

    let stranger = ConsultationRepo::confirm_booking(&pool, booking.id, other_lawyer.id)
        .await
        .expect("confirm should succeed")
        .expect("booking exists");
    assert!(matches!(stranger, ConfirmOutcome::NotOwner));

    let confirmed = ConsultationRepo::confirm_booking(&pool, booking.id, owner.id)
        .await
        .expect("confirm should succeed")
        .expect("booking exists");
    let confirmed_booking = match confirmed {
        ConfirmOutcome::Confirmed(b) => b,
        other => panic!("owner confirm must succeed, got {other:?}"),
    };
    assert!(confirmed_booking.confirmed);

    let refreshed = ConsultationRepo::find_slot_by_id(&pool, slot.id)
        .await
        .expect("lookup should succeed")
        .expect("slot exists");
    assert!(refreshed.is_booked, "confirmation must mark the slot booked");

    // Re-confirming is reported, not re-applied.
    let again = ConsultationRepo::confirm_booking(&pool, booking.id, owner.id)
        .await
        .expect("confirm should succeed")
        .expect("booking exists");
    assert!(matches!(again, ConfirmOutcome::AlreadyConfirmed));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_booked_slot_rejects_new_bookings(pool: PgPool) {
    let lawyer = create_user(&pool, "lawyer6", "lawyer").await;
    let alice = create_user(&pool, "alice6", "citizen").await;
    let bob = create_user(&pool, "bob6", "citizen").await;

    let slot = ConsultationRepo::create_slot(&pool, &slot_at(lawyer.id, 16))
        .await
        .expect("slot creation should succeed");
    let booking = match ConsultationRepo::book_slot(&pool, slot.id, alice.id)
        .await
        .expect("booking should succeed")
        .expect("slot exists")
    {
        BookingOutcome::Created(b) => b,
        BookingOutcome::SlotUnavailable => panic!("open slot must be bookable"),
    };
    ConsultationRepo::confirm_booking(&pool, booking.id, lawyer.id)
        .await
        .expect("confirm should succeed");

    let late = ConsultationRepo::book_slot(&pool, slot.id, bob.id)
        .await
        .expect("booking call should succeed")
        .expect("slot exists");
    assert!(matches!(late, BookingOutcome::SlotUnavailable));

    let open = ConsultationRepo::list_open(&pool)
        .await
        .expect("listing should succeed");
    assert!(open.iter().all(|s| s.id != slot.id), "booked slot must leave the open list");
}
