//! Repository for the `users` table.

use rollon_core::audit::{ACTION_USER_REGISTERED, ACTION_USER_ROLE_CHANGED};
use rollon_core::types::DbId;
use sqlx::PgPool;

use crate::models::audit::CreateAuditLog;
use crate::models::user::{CreateUser, User};
use crate::repositories::AuditLogRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, role, is_active, \
                       created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row. The registration is
    /// audited in the same transaction.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::create(
            &mut *tx,
            &CreateAuditLog {
                actor_id: Some(user.id),
                action: ACTION_USER_REGISTERED.to_string(),
                entity_type: Some("user".into()),
                entity_id: Some(user.id),
                context: Some(serde_json::json!({ "role": user.role })),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Change a user's role. Admin-gated at the handler; audited here in
    /// the same transaction. Returns `None` if no such user exists.
    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        role: &str,
        acting_admin_id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE users SET role = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref user) = updated {
            AuditLogRepo::create(
                &mut *tx,
                &CreateAuditLog {
                    actor_id: Some(acting_admin_id),
                    action: ACTION_USER_ROLE_CHANGED.to_string(),
                    entity_type: Some("user".into()),
                    entity_id: Some(user.id),
                    context: Some(serde_json::json!({ "role": role })),
                },
            )
            .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }
}
