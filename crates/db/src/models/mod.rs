//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Operation-specific outcome types where a repository method does more
//!   than a plain insert

pub mod audit;
pub mod consultation;
pub mod deposition;
pub mod evidence;
pub mod petition;
pub mod user;
