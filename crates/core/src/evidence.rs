//! Evidence tags and moderation rules.
//!
//! The file itself lives in the blob store; this module only knows about
//! the tags recorded alongside the reference. Constants must match the
//! CHECK constraints in `20260301000002_create_evidence_table.sql`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;

pub const FILE_TYPE_IMAGE: &str = "image";
pub const FILE_TYPE_PDF: &str = "pdf";
pub const FILE_TYPE_VIDEO: &str = "video";
pub const FILE_TYPE_DOC: &str = "doc";
pub const FILE_TYPE_OTHER: &str = "other";

pub const VALID_FILE_TYPES: &[&str] = &[
    FILE_TYPE_IMAGE,
    FILE_TYPE_PDF,
    FILE_TYPE_VIDEO,
    FILE_TYPE_DOC,
    FILE_TYPE_OTHER,
];

/// Moderation status of an uploaded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<VerificationStatus> {
        match s {
            "pending" => Some(VerificationStatus::Pending),
            "verified" => Some(VerificationStatus::Verified),
            "rejected" => Some(VerificationStatus::Rejected),
            _ => None,
        }
    }
}

/// Validate a file-type tag against the accepted set.
pub fn validate_file_type(file_type: &str) -> Result<(), CoreError> {
    if VALID_FILE_TYPES.contains(&file_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid file type '{file_type}'. Must be one of: {}",
            VALID_FILE_TYPES.join(", ")
        )))
    }
}

/// Moderation gate: only admins change verification status, and the
/// target status must be a decision, not a reset to pending.
pub fn validate_moderation(role: Role, target: VerificationStatus) -> Result<(), CoreError> {
    if !role.is_admin() {
        return Err(CoreError::Forbidden(
            "Only admins can moderate evidence".into(),
        ));
    }
    if target == VerificationStatus::Pending {
        return Err(CoreError::Validation(
            "Moderation must resolve to verified or rejected".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_validation() {
        for ft in VALID_FILE_TYPES {
            assert!(validate_file_type(ft).is_ok());
        }
        assert!(validate_file_type("exe").is_err());
    }

    #[test]
    fn test_verification_status_roundtrip() {
        for status in [
            VerificationStatus::Pending,
            VerificationStatus::Verified,
            VerificationStatus::Rejected,
        ] {
            assert_eq!(VerificationStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_moderation_requires_admin() {
        assert!(validate_moderation(Role::Citizen, VerificationStatus::Verified).is_err());
        assert!(validate_moderation(Role::Lawyer, VerificationStatus::Rejected).is_err());
        assert!(validate_moderation(Role::Admin, VerificationStatus::Verified).is_ok());
    }

    #[test]
    fn test_moderation_cannot_reset_to_pending() {
        assert!(matches!(
            validate_moderation(Role::Admin, VerificationStatus::Pending),
            Err(CoreError::Validation(_))
        ));
    }
}
