//! # Admin Module
//!
//! Moderation dashboard and user/project moderation, gated by the role
//! checks in the auth module.

pub mod handlers;
pub mod models;
pub mod routes;

pub use routes::admin_routes;
