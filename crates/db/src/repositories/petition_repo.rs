//! Repository for the `petitions` table and its join tables.
//!
//! Lifecycle writes are transactional and audited. The two operations with
//! read-then-write hazards -- status transitions and supporter accounting --
//! take a row lock (guarded UPDATE / `SELECT ... FOR UPDATE`) so concurrent
//! requests serialize on the petition row instead of clobbering each other.

use rollon_core::audit::ACTION_PETITION_SUPPORTED;
use rollon_core::petition::PetitionStatus;
use rollon_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::audit::CreateAuditLog;
use crate::models::petition::{CreatePetition, Petition, SupportOutcome};
use crate::repositories::AuditLogRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, creator_id, title, description, category, visibility, \
                       status, supporter_count, created_at, published_at";

/// Provides creation, listing, lifecycle transitions, and supporter
/// accounting for petitions.
pub struct PetitionRepo;

impl PetitionRepo {
    /// Create a draft petition and attach the creator's evidence.
    ///
    /// Evidence ids not owned by the creator are skipped rather than
    /// rejected, matching the attach-what-is-yours listing the client saw.
    /// Audited in the same transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePetition,
        audit_action: &str,
    ) -> Result<Petition, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO petitions (creator_id, title, description, category, visibility)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let petition = sqlx::query_as::<_, Petition>(&query)
            .bind(input.creator_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.visibility)
            .fetch_one(&mut *tx)
            .await?;

        if !input.evidence_ids.is_empty() {
            sqlx::query(
                "INSERT INTO petition_evidence (petition_id, evidence_id)
                 SELECT $1, id FROM evidence WHERE id = ANY($2) AND uploader_id = $3
                 ON CONFLICT ON CONSTRAINT uq_petition_evidence DO NOTHING",
            )
            .bind(petition.id)
            .bind(&input.evidence_ids)
            .bind(input.creator_id)
            .execute(&mut *tx)
            .await?;
        }

        AuditLogRepo::create(
            &mut *tx,
            &CreateAuditLog {
                actor_id: Some(input.creator_id),
                action: audit_action.to_string(),
                entity_type: Some("petition".into()),
                entity_id: Some(petition.id),
                context: Some(serde_json::json!({ "category": petition.category })),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(petition)
    }

    /// Find a petition by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Petition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM petitions WHERE id = $1");
        sqlx::query_as::<_, Petition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List petitions visible to the given viewer, newest first.
    ///
    /// Admins see everything; an authenticated user sees published public
    /// petitions plus their own; anonymous viewers see only published
    /// public petitions.
    pub async fn list_visible(
        pool: &PgPool,
        viewer: Option<(DbId, bool)>,
    ) -> Result<Vec<Petition>, sqlx::Error> {
        match viewer {
            Some((_, true)) => {
                let query = format!("SELECT {COLUMNS} FROM petitions ORDER BY created_at DESC");
                sqlx::query_as::<_, Petition>(&query).fetch_all(pool).await
            }
            Some((user_id, false)) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM petitions
                     WHERE creator_id = $1
                        OR (status = 'published' AND visibility = 'public')
                     ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, Petition>(&query)
                    .bind(user_id)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM petitions
                     WHERE status = 'published' AND visibility = 'public'
                     ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, Petition>(&query).fetch_all(pool).await
            }
        }
    }

    /// List pending petitions for the admin review queue, oldest first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<Petition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM petitions WHERE status = 'pending' ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Petition>(&query).fetch_all(pool).await
    }

    /// Apply a status transition guarded on the expected current status.
    ///
    /// The UPDATE only matches while `status = from`, so a concurrent
    /// transition makes this return `None` instead of overwriting; the
    /// caller re-reads and reports the soft no-op. `published_at` is only
    /// ever filled in once (COALESCE), satisfying the set-exactly-once
    /// rule even if a publish races a re-publish.
    ///
    /// The audit entry is written in the same transaction as the update.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: PetitionStatus,
        to: PetitionStatus,
        actor_id: DbId,
        audit_action: &str,
        now: Timestamp,
    ) -> Result<Option<Petition>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let publish_at = (to == PetitionStatus::Published).then_some(now);
        let query = format!(
            "UPDATE petitions SET
                status = $3,
                published_at = COALESCE(published_at, $4)
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Petition>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .bind(publish_at)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref petition) = updated {
            AuditLogRepo::create(
                &mut *tx,
                &CreateAuditLog {
                    actor_id: Some(actor_id),
                    action: audit_action.to_string(),
                    entity_type: Some("petition".into()),
                    entity_id: Some(petition.id),
                    context: Some(serde_json::json!({
                        "from": from.as_str(),
                        "to": to.as_str(),
                    })),
                },
            )
            .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Register a supporter and refresh the cached count atomically.
    ///
    /// Locks the petition row first so two simultaneous supports serialize;
    /// the count is then recomputed from the supporter set inside the same
    /// transaction, keeping `supporter_count == |petition_supporters|` as
    /// an invariant rather than a hope. Unpublished petitions are invisible
    /// to this operation and return `None`.
    ///
    /// Idempotent: a repeat support by the same user mutates nothing and
    /// comes back with `newly_added = false`.
    pub async fn support(
        pool: &PgPool,
        petition_id: DbId,
        user_id: DbId,
    ) -> Result<Option<SupportOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM petitions WHERE id = $1 AND status = 'published' FOR UPDATE",
        )
        .bind(petition_id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Ok(None);
        }

        let inserted = sqlx::query(
            "INSERT INTO petition_supporters (petition_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_petition_supporters DO NOTHING",
        )
        .bind(petition_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        let newly_added = inserted.rows_affected() > 0;

        let supporter_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)::BIGINT FROM petition_supporters WHERE petition_id = $1",
        )
        .bind(petition_id)
        .fetch_one(&mut *tx)
        .await?;

        if newly_added {
            sqlx::query("UPDATE petitions SET supporter_count = $2 WHERE id = $1")
                .bind(petition_id)
                .bind(supporter_count)
                .execute(&mut *tx)
                .await?;

            AuditLogRepo::create(
                &mut *tx,
                &CreateAuditLog {
                    actor_id: Some(user_id),
                    action: ACTION_PETITION_SUPPORTED.to_string(),
                    entity_type: Some("petition".into()),
                    entity_id: Some(petition_id),
                    context: Some(serde_json::json!({ "supporter_count": supporter_count })),
                },
            )
            .await?;
        }

        tx.commit().await?;
        Ok(Some(SupportOutcome {
            newly_added,
            supporter_count,
        }))
    }

    /// Whether a user is in a petition's supporter set.
    pub async fn is_supporter(
        pool: &PgPool,
        petition_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM petition_supporters WHERE petition_id = $1 AND user_id = $2",
        )
        .bind(petition_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(exists.is_some())
    }
}
