//! Shared response envelope types for API handlers.

use serde::Serialize;

/// `{ "message": ... }` body for lifecycle actions (submit, approve,
/// support, confirm). Soft idempotent no-ops use this shape too, which is
/// what distinguishes "already done" from a hard error.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
