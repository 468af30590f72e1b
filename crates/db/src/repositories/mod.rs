//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must join an
//! outer transaction (audit appends) take a `PgExecutor` instead.

pub mod audit_repo;
pub mod consultation_repo;
pub mod deposition_repo;
pub mod evidence_repo;
pub mod petition_repo;
pub mod user_repo;

pub use audit_repo::AuditLogRepo;
pub use consultation_repo::ConsultationRepo;
pub use deposition_repo::DepositionRepo;
pub use evidence_repo::EvidenceRepo;
pub use petition_repo::PetitionRepo;
pub use user_repo::UserRepo;
