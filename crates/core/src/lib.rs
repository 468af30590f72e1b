//! Pure domain logic for the Rollon civic-engagement platform.
//!
//! Nothing here touches the database or the network. The petition state
//! machine, role gating, and validation rules live in this crate so the
//! DB and API layers can share one source of truth and the rules are
//! testable without a running Postgres.

pub mod audit;
pub mod consultation;
pub mod error;
pub mod evidence;
pub mod petition;
pub mod roles;
pub mod types;
