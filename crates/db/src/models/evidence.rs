//! Evidence entity model and DTOs.

use rollon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An evidence row. `uploader_id`, `uploaded_at`, and `size_bytes` are set
/// at creation and never updated; moderation fields change only through
/// [`crate::repositories::EvidenceRepo::moderate`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Evidence {
    pub id: DbId,
    pub uploader_id: DbId,
    pub title: String,
    /// Blob-store reference; no file I/O happens in this service.
    pub file_path: String,
    pub file_type: String,
    pub size_bytes: Option<i64>,
    pub case_tag: String,
    pub verification_status: String,
    pub rule_violation: String,
    pub party_involved: String,
    pub harm: String,
    pub uploaded_at: Timestamp,
}

/// DTO for registering an uploaded artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvidence {
    pub uploader_id: DbId,
    pub title: String,
    pub file_path: String,
    pub file_type: String,
    /// Byte size reported by the blob store at upload time.
    pub size_bytes: Option<i64>,
    pub case_tag: Option<String>,
}

/// DTO for an admin moderation decision.
#[derive(Debug, Clone, Deserialize)]
pub struct ModerateEvidence {
    /// `"verified"` or `"rejected"`.
    pub verification_status: String,
    pub rule_violation: Option<String>,
    pub party_involved: Option<String>,
    pub harm: Option<String>,
}
