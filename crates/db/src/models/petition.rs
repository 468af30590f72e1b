//! Petition entity model, DTOs, and lifecycle outcome types.

use rollon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A petition row. `status` holds one of the
/// `rollon_core::petition::PetitionStatus` names; `supporter_count` is a
/// cache kept equal to the cardinality of `petition_supporters` by the
/// transactional support operation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Petition {
    pub id: DbId,
    pub creator_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub visibility: String,
    pub status: String,
    pub supporter_count: i64,
    pub created_at: Timestamp,
    /// Set exactly once, when the petition first transitions to published.
    pub published_at: Option<Timestamp>,
}

/// DTO for creating a draft petition.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePetition {
    pub creator_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub visibility: String,
    /// Evidence to attach at creation. Only rows owned by the creator are
    /// attached; foreign ids are silently skipped.
    pub evidence_ids: Vec<DbId>,
}

/// Result of the transactional support operation.
#[derive(Debug, Clone, Serialize)]
pub struct SupportOutcome {
    /// False when the actor already supported the petition (idempotent
    /// no-op; nothing was mutated).
    pub newly_added: bool,
    /// Supporter count after the operation; always equals the current
    /// cardinality of the supporter set.
    pub supporter_count: i64,
}
