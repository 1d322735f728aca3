//! # Users Module
//!
//! Public profile lookup, profile updates, username availability, and avatar
//! uploads.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::users_routes;
