//! # Likes Module
//!
//! Transactional like toggles for projects and comments, plus the
//! client-side optimistic toggle state machine.

pub mod handlers;
pub mod models;
pub mod optimistic;
pub mod routes;

#[cfg(test)]
mod tests;

pub use models::LikeStatus;
pub use optimistic::{Activation, LikeSnapshot, LikeToggleControl};
pub use routes::likes_routes;
