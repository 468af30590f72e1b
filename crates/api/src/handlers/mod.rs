//! HTTP request handlers, grouped by resource.

use rollon_core::error::CoreError;
use rollon_core::roles::Role;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

pub mod admin;
pub mod auth;
pub mod consultations;
pub mod depositions;
pub mod evidence;
pub mod petitions;

/// Resolve the typed role from an authenticated user's claims.
///
/// A token carrying an unknown role name is treated as unauthorized: roles
/// only come from the database CHECK-constrained column, so this means the
/// token was not issued by us (or predates a role rename).
pub(crate) fn role_of(user: &AuthUser) -> Result<Role, AppError> {
    Role::parse(&user.role)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid role claim".into())))
}
