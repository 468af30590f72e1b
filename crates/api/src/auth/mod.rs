//! Token issuance and password hashing.

pub mod jwt;
pub mod password;
