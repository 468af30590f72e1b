//! Well-known audit action names.
//!
//! Lifecycle repositories write these inside the same transaction as the
//! mutation they describe, so the trail and the data cannot disagree.

pub const ACTION_USER_REGISTERED: &str = "user.registered";
pub const ACTION_USER_ROLE_CHANGED: &str = "user.role_changed";

pub const ACTION_PETITION_CREATED: &str = "petition.created";
pub const ACTION_PETITION_SUBMITTED: &str = "petition.submitted";
pub const ACTION_PETITION_PUBLISHED: &str = "petition.published";
pub const ACTION_PETITION_REJECTED: &str = "petition.rejected";
pub const ACTION_PETITION_SUPPORTED: &str = "petition.supported";

pub const ACTION_EVIDENCE_REGISTERED: &str = "evidence.registered";
pub const ACTION_EVIDENCE_MODERATED: &str = "evidence.moderated";

pub const ACTION_SLOT_PUBLISHED: &str = "consultation.slot_published";
pub const ACTION_SLOT_BOOKED: &str = "consultation.slot_booked";
pub const ACTION_BOOKING_CONFIRMED: &str = "consultation.booking_confirmed";

pub const ACTION_DEPOSITION_CREATED: &str = "deposition.created";
pub const ACTION_DEPOSITION_EVIDENCE_ATTACHED: &str = "deposition.evidence_attached";
