//! Shared fixtures for repository integration tests.

use chrono::Utc;
use rollon_core::audit::{ACTION_PETITION_PUBLISHED, ACTION_PETITION_SUBMITTED};
use rollon_core::petition::PetitionStatus;
use rollon_db::models::petition::{CreatePetition, Petition};
use rollon_db::models::user::{CreateUser, User};
use rollon_db::repositories::{PetitionRepo, UserRepo};
use sqlx::PgPool;

/// Create a user with the given role. The password hash is a placeholder;
/// repository tests never log in.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: "not-a-real-hash".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Create a draft petition with a long-enough description.
pub async fn create_draft(pool: &PgPool, creator_id: i64, title: &str) -> Petition {
    PetitionRepo::create(
        pool,
        &CreatePetition {
            creator_id,
            title: title.to_string(),
            description: "A description long enough to pass the fifty character minimum rule."
                .to_string(),
            category: "general".to_string(),
            visibility: "public".to_string(),
            evidence_ids: vec![],
        },
        "petition.created",
    )
    .await
    .expect("petition creation should succeed")
}

/// Walk a draft petition through submit and approve so it is published.
pub async fn publish_petition(pool: &PgPool, petition_id: i64, admin_id: i64) -> Petition {
    PetitionRepo::transition(
        pool,
        petition_id,
        PetitionStatus::Draft,
        PetitionStatus::Pending,
        admin_id,
        ACTION_PETITION_SUBMITTED,
        Utc::now(),
    )
    .await
    .expect("submit transition should succeed")
    .expect("petition should be in draft");

    PetitionRepo::transition(
        pool,
        petition_id,
        PetitionStatus::Pending,
        PetitionStatus::Published,
        admin_id,
        ACTION_PETITION_PUBLISHED,
        Utc::now(),
    )
    .await
    .expect("approve transition should succeed")
    .expect("petition should be pending")
}
