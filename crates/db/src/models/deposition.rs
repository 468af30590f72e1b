//! Deposition models: the narrative row plus its ordered evidence sequence.

use rollon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Deposition {
    pub id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a deposition.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeposition {
    pub author_id: DbId,
    pub title: String,
    pub content: Option<String>,
}

/// One entry in a deposition's evidence sequence, joined with the evidence
/// row it references. Sequences read back ordered by (position, id).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SequencedEvidence {
    pub evidence_id: DbId,
    pub position: i32,
    pub title: String,
    pub file_type: String,
    pub verification_status: String,
}
