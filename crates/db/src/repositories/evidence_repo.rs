//! Repository for the `evidence` table.

use rollon_core::audit::{ACTION_EVIDENCE_MODERATED, ACTION_EVIDENCE_REGISTERED};
use rollon_core::types::DbId;
use sqlx::PgPool;

use crate::models::audit::CreateAuditLog;
use crate::models::evidence::{CreateEvidence, Evidence, ModerateEvidence};
use crate::repositories::AuditLogRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, uploader_id, title, file_path, file_type, size_bytes, \
                       case_tag, verification_status, rule_violation, party_involved, \
                       harm, uploaded_at";

/// Provides registration, listing, and moderation for uploaded evidence.
pub struct EvidenceRepo;

impl EvidenceRepo {
    /// Register an uploaded artifact, returning the created row. Audited in
    /// the same transaction.
    pub async fn create(pool: &PgPool, input: &CreateEvidence) -> Result<Evidence, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO evidence (uploader_id, title, file_path, file_type, size_bytes, case_tag)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, ''))
             RETURNING {COLUMNS}"
        );
        let evidence = sqlx::query_as::<_, Evidence>(&query)
            .bind(input.uploader_id)
            .bind(&input.title)
            .bind(&input.file_path)
            .bind(&input.file_type)
            .bind(input.size_bytes)
            .bind(&input.case_tag)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::create(
            &mut *tx,
            &CreateAuditLog {
                actor_id: Some(input.uploader_id),
                action: ACTION_EVIDENCE_REGISTERED.to_string(),
                entity_type: Some("evidence".into()),
                entity_id: Some(evidence.id),
                context: Some(serde_json::json!({
                    "file_type": evidence.file_type,
                    "size_bytes": evidence.size_bytes,
                })),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(evidence)
    }

    /// Find an evidence row by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Evidence>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM evidence WHERE id = $1");
        sqlx::query_as::<_, Evidence>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List evidence uploaded by one user, newest first.
    pub async fn list_by_uploader(
        pool: &PgPool,
        uploader_id: DbId,
    ) -> Result<Vec<Evidence>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM evidence WHERE uploader_id = $1 ORDER BY uploaded_at DESC");
        sqlx::query_as::<_, Evidence>(&query)
            .bind(uploader_id)
            .fetch_all(pool)
            .await
    }

    /// List all evidence, optionally filtered by verification status.
    /// Admin-gated at the handler.
    pub async fn list_all(
        pool: &PgPool,
        verification_status: Option<&str>,
    ) -> Result<Vec<Evidence>, sqlx::Error> {
        match verification_status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM evidence WHERE verification_status = $1 \
                     ORDER BY uploaded_at DESC"
                );
                sqlx::query_as::<_, Evidence>(&query)
                    .bind(status)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM evidence ORDER BY uploaded_at DESC");
                sqlx::query_as::<_, Evidence>(&query).fetch_all(pool).await
            }
        }
    }

    /// List evidence attached to a petition.
    pub async fn list_for_petition(
        pool: &PgPool,
        petition_id: DbId,
    ) -> Result<Vec<Evidence>, sqlx::Error> {
        let query = format!(
            "SELECT e.id, e.uploader_id, e.title, e.file_path, e.file_type, e.size_bytes, \
                    e.case_tag, e.verification_status, e.rule_violation, e.party_involved, \
                    e.harm, e.uploaded_at
             FROM evidence e
             JOIN petition_evidence pe ON pe.evidence_id = e.id
             WHERE pe.petition_id = $1
             ORDER BY e.uploaded_at DESC"
        );
        sqlx::query_as::<_, Evidence>(&query)
            .bind(petition_id)
            .fetch_all(pool)
            .await
    }

    /// Apply an admin moderation decision. Annotations default to their
    /// previous values when not provided. Audited in the same transaction.
    /// Returns `None` if no such evidence exists.
    pub async fn moderate(
        pool: &PgPool,
        id: DbId,
        input: &ModerateEvidence,
        acting_admin_id: DbId,
    ) -> Result<Option<Evidence>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE evidence SET
                verification_status = $2,
                rule_violation = COALESCE($3, rule_violation),
                party_involved = COALESCE($4, party_involved),
                harm = COALESCE($5, harm)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Evidence>(&query)
            .bind(id)
            .bind(&input.verification_status)
            .bind(&input.rule_violation)
            .bind(&input.party_involved)
            .bind(&input.harm)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref evidence) = updated {
            AuditLogRepo::create(
                &mut *tx,
                &CreateAuditLog {
                    actor_id: Some(acting_admin_id),
                    action: ACTION_EVIDENCE_MODERATED.to_string(),
                    entity_type: Some("evidence".into()),
                    entity_id: Some(evidence.id),
                    context: Some(serde_json::json!({
                        "verification_status": input.verification_status,
                    })),
                },
            )
            .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }
}
