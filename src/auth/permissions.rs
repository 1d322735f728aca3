//! Role gates and ownership checks
//!
//! These are pure functions over an already-resolved identity so call sites
//! (and tests) never depend on request plumbing. `NotLoggedIn` is always
//! checked before any role comparison.

use crate::common::ApiError;

use super::models::{User, UserRole};

/// Role requirement for [`require_role`]. A closed two-variant enum, not a
/// boolean flag: admin-only call sites name `Admin`, moderation call sites
/// name `Moderator`, and the two cannot be conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    Admin,
    Moderator,
}

/// Generic admin-area gate: admins and moderators both pass.
///
/// Fails `NotLoggedIn` when no identity is present, `NotAdmin` when the
/// resolved role is neither admin nor moderator.
pub fn require_admin_permission(user: Option<&User>) -> Result<&User, ApiError> {
    let user = user.ok_or(ApiError::NotLoggedIn)?;

    match user.role() {
        UserRole::Admin | UserRole::Moderator => Ok(user),
        UserRole::User => Err(ApiError::NotAdmin),
    }
}

/// Stricter role gate.
///
/// `RequiredRole::Admin` is satisfied only by an admin; `RequiredRole::Moderator`
/// by an admin or a moderator.
pub fn require_role(user: Option<&User>, required: RequiredRole) -> Result<&User, ApiError> {
    let user = user.ok_or(ApiError::NotLoggedIn)?;

    let satisfied = match required {
        RequiredRole::Admin => user.role() == UserRole::Admin,
        RequiredRole::Moderator => {
            matches!(user.role(), UserRole::Admin | UserRole::Moderator)
        }
    };

    if satisfied {
        Ok(user)
    } else {
        match required {
            RequiredRole::Admin => Err(ApiError::NotAdmin),
            RequiredRole::Moderator => Err(ApiError::NotModerator),
        }
    }
}

/// Ownership check used by update/delete handlers.
///
/// Orthogonal to the role gates above: an admin caller does not implicitly
/// pass this check.
pub fn require_owner(owner_id: &str, caller_id: &str) -> Result<(), ApiError> {
    if owner_id == caller_id {
        Ok(())
    } else {
        Err(ApiError::InsufficientPermission(
            "You do not own this resource".to_string(),
        ))
    }
}
