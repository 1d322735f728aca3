//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - OAuth code exchange with the external provider
//! - JWT session issuance and validation
//! - AuthedUser/MaybeUser extractors for routes
//! - Role gates and ownership checks

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod permissions;
pub mod routes;

#[cfg(test)]
mod tests;

pub use extractors::{resolve_request_user, AuthedUser, MaybeUser};
pub use models::{User, UserRole, UserStatus};
pub use permissions::{require_admin_permission, require_owner, require_role, RequiredRole};
pub use routes::auth_routes;
