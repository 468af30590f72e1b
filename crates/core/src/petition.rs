//! Petition lifecycle: statuses, role gates, and transition decisions.
//!
//! The decision functions here are pure: they take the acting role, the
//! current status, and ownership facts, and return either a [`Transition`]
//! or a [`CoreError`]. Persistence (and the locking that keeps the
//! supporter count honest) lives in `rollon_db::repositories::petition_repo`.
//!
//! The distinction between a hard failure and a soft no-op is deliberate:
//! re-submitting an already-submitted petition or approving an already
//! published one answers with a message, never an error. A role or
//! ownership mismatch is always a hard `Forbidden`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Minimum petition description length, in characters.
pub const MIN_DESCRIPTION_CHARS: usize = 50;

// ---------------------------------------------------------------------------
// Status, visibility, category tags
// ---------------------------------------------------------------------------

/// Petition lifecycle status. `Published` and `Rejected` are terminal: no
/// transition out of them is defined, and the review gates treat them as
/// soft no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetitionStatus {
    Draft,
    Pending,
    Published,
    Rejected,
}

impl PetitionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PetitionStatus::Draft => "draft",
            PetitionStatus::Pending => "pending",
            PetitionStatus::Published => "published",
            PetitionStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<PetitionStatus> {
        match s {
            "draft" => Some(PetitionStatus::Draft),
            "pending" => Some(PetitionStatus::Pending),
            "published" => Some(PetitionStatus::Published),
            "rejected" => Some(PetitionStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PetitionStatus::Published | PetitionStatus::Rejected)
    }
}

impl fmt::Display for PetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    pub fn parse(s: &str) -> Option<Visibility> {
        match s {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }
}

/// Petition category tags. Must match the CHECK constraint on
/// `petitions.category`.
pub const VALID_CATEGORIES: &[&str] = &["general", "legal", "welfare", "environment", "policy"];

/// Validate a category tag against the accepted set.
pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if VALID_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid category '{category}'. Must be one of: {}",
            VALID_CATEGORIES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Transition outcome
// ---------------------------------------------------------------------------

/// Outcome of a lifecycle gate that passed authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Apply the transition: persist the new status.
    Apply(PetitionStatus),
    /// The petition is already past this step. Respond with the message
    /// and do not mutate anything.
    AlreadyDone(String),
}

/// A review decision by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// The status this decision moves a pending petition into.
    pub fn target_status(self) -> PetitionStatus {
        match self {
            ReviewDecision::Approve => PetitionStatus::Published,
            ReviewDecision::Reject => PetitionStatus::Rejected,
        }
    }
}

// ---------------------------------------------------------------------------
// Gates
// ---------------------------------------------------------------------------

/// Validate the inputs to draft creation. Only citizens create petitions,
/// and the description must carry enough substance to review.
pub fn validate_create(role: Role, description: &str) -> Result<(), CoreError> {
    if !role.is_citizen() {
        return Err(CoreError::Forbidden(
            "Only citizens can create petitions".into(),
        ));
    }
    if description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(CoreError::Validation(format!(
            "Description must be at least {MIN_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(())
}

/// Gate for the creator submitting a draft for admin review.
///
/// Ownership is checked before role so a lawyer poking at someone else's
/// petition gets the ownership error, not a role hint.
pub fn submit_for_review(
    role: Role,
    is_creator: bool,
    status: PetitionStatus,
) -> Result<Transition, CoreError> {
    if !is_creator {
        return Err(CoreError::Forbidden(
            "You can only submit your own petitions".into(),
        ));
    }
    if !role.is_citizen() {
        return Err(CoreError::Forbidden(
            "Only citizens can submit petitions".into(),
        ));
    }
    if status != PetitionStatus::Draft {
        return Ok(Transition::AlreadyDone(format!(
            "Petition is already {status}."
        )));
    }
    Ok(Transition::Apply(PetitionStatus::Pending))
}

/// Gate for an admin approving or rejecting a pending petition.
///
/// Idempotent on terminal states: reviewing anything not pending is a
/// soft no-op.
pub fn review(
    role: Role,
    decision: ReviewDecision,
    status: PetitionStatus,
) -> Result<Transition, CoreError> {
    if !role.is_admin() {
        return Err(CoreError::Forbidden(
            "Only admins can review petitions".into(),
        ));
    }
    if status != PetitionStatus::Pending {
        return Ok(Transition::AlreadyDone(
            "Petition is not pending review.".into(),
        ));
    }
    Ok(Transition::Apply(decision.target_status()))
}

/// Role gate for supporting a petition. The published-status requirement is
/// enforced at the repository: unpublished petitions are invisible to the
/// support operation and surface as `NotFound`.
pub fn authorize_support(role: Role) -> Result<(), CoreError> {
    if !role.is_citizen() {
        return Err(CoreError::Forbidden(
            "Only citizens can support petitions".into(),
        ));
    }
    Ok(())
}

/// Whether the support operation may see a petition in this status.
pub fn is_supportable(status: PetitionStatus) -> bool {
    status == PetitionStatus::Published
}

/// Listing/detail visibility rule: published public petitions are visible
/// to anyone; everything else only to the creator and admins.
pub fn is_visible_to(
    status: PetitionStatus,
    visibility: Visibility,
    creator_id: DbId,
    viewer: Option<(DbId, Role)>,
) -> bool {
    if status == PetitionStatus::Published && visibility == Visibility::Public {
        return true;
    }
    match viewer {
        Some((_, role)) if role.is_admin() => true,
        Some((id, _)) => id == creator_id,
        None => false,
    }
}
