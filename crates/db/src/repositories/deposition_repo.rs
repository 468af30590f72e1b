//! Repository for depositions and their ordered evidence sequence.

use rollon_core::audit::{ACTION_DEPOSITION_CREATED, ACTION_DEPOSITION_EVIDENCE_ATTACHED};
use rollon_core::types::DbId;
use sqlx::PgPool;

use crate::models::audit::CreateAuditLog;
use crate::models::deposition::{CreateDeposition, Deposition, SequencedEvidence};
use crate::repositories::AuditLogRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, author_id, title, content, created_at, updated_at";

/// Provides CRUD and sequence compilation for depositions.
pub struct DepositionRepo;

impl DepositionRepo {
    /// Create a deposition. Audited in the same transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDeposition,
    ) -> Result<Deposition, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO depositions (author_id, title, content)
             VALUES ($1, $2, COALESCE($3, ''))
             RETURNING {COLUMNS}"
        );
        let deposition = sqlx::query_as::<_, Deposition>(&query)
            .bind(input.author_id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::create(
            &mut *tx,
            &CreateAuditLog {
                actor_id: Some(input.author_id),
                action: ACTION_DEPOSITION_CREATED.to_string(),
                entity_type: Some("deposition".into()),
                entity_id: Some(deposition.id),
                context: None,
            },
        )
        .await?;

        tx.commit().await?;
        Ok(deposition)
    }

    /// Find a deposition by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Deposition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM depositions WHERE id = $1");
        sqlx::query_as::<_, Deposition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one author's depositions, most recently updated first.
    pub async fn list_by_author(
        pool: &PgPool,
        author_id: DbId,
    ) -> Result<Vec<Deposition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM depositions WHERE author_id = $1 ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Deposition>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// Attach evidence at a position in the sequence.
    ///
    /// A duplicate (deposition, evidence) pair violates
    /// `uq_deposition_evidence` and propagates as a conflict. Bumps the
    /// deposition's `updated_at` and audits in the same transaction.
    pub async fn attach_evidence(
        pool: &PgPool,
        deposition_id: DbId,
        evidence_id: DbId,
        position: i32,
        author_id: DbId,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO deposition_evidence (deposition_id, evidence_id, position)
             VALUES ($1, $2, $3)",
        )
        .bind(deposition_id)
        .bind(evidence_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE depositions SET updated_at = NOW() WHERE id = $1")
            .bind(deposition_id)
            .execute(&mut *tx)
            .await?;

        AuditLogRepo::create(
            &mut *tx,
            &CreateAuditLog {
                actor_id: Some(author_id),
                action: ACTION_DEPOSITION_EVIDENCE_ATTACHED.to_string(),
                entity_type: Some("deposition".into()),
                entity_id: Some(deposition_id),
                context: Some(serde_json::json!({
                    "evidence_id": evidence_id,
                    "position": position,
                })),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Remove evidence from the sequence. Returns `true` if a row was
    /// removed.
    pub async fn detach_evidence(
        pool: &PgPool,
        deposition_id: DbId,
        evidence_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM deposition_evidence WHERE deposition_id = $1 AND evidence_id = $2",
        )
        .bind(deposition_id)
        .bind(evidence_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Read the evidence sequence ordered by (position, id): explicit
    /// position first, insertion order as the tie-break.
    pub async fn list_sequence(
        pool: &PgPool,
        deposition_id: DbId,
    ) -> Result<Vec<SequencedEvidence>, sqlx::Error> {
        sqlx::query_as::<_, SequencedEvidence>(
            "SELECT de.evidence_id, de.position, e.title, e.file_type, e.verification_status
             FROM deposition_evidence de
             JOIN evidence e ON e.id = de.evidence_id
             WHERE de.deposition_id = $1
             ORDER BY de.position ASC, de.id ASC",
        )
        .bind(deposition_id)
        .fetch_all(pool)
        .await
    }
}
