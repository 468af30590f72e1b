//! Consultation scheduling rules.

use chrono::Duration;

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::Timestamp;

/// Default slot length when the lawyer does not specify one.
pub const DEFAULT_DURATION_MINUTES: i32 = 30;

/// Gate for publishing a slot: lawyers only, positive duration.
pub fn validate_publish_slot(role: Role, duration_minutes: i32) -> Result<(), CoreError> {
    if !role.is_lawyer() {
        return Err(CoreError::Forbidden(
            "Only lawyers can publish consultation slots".into(),
        ));
    }
    if duration_minutes <= 0 {
        return Err(CoreError::Validation(
            "Slot duration must be positive".into(),
        ));
    }
    Ok(())
}

/// Role gate for booking a slot.
pub fn authorize_booking(role: Role) -> Result<(), CoreError> {
    if !role.is_citizen() {
        return Err(CoreError::Forbidden(
            "Only citizens can book consultations".into(),
        ));
    }
    Ok(())
}

/// Derived slot end time. Computed for display, never stored.
pub fn end_time(start_time: Timestamp, duration_minutes: i32) -> Timestamp {
    start_time + Duration::minutes(i64::from(duration_minutes))
}
