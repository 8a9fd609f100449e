//! Well-known role name constants.
//!
//! These must match the `ck_users_role` constraint in the users migration.

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// Returns `true` when `role` is one of the known role names.
pub fn is_known_role(role: &str) -> bool {
    matches!(role, ROLE_USER | ROLE_ADMIN)
}
