//! # Comments Module
//!
//! Comment CRUD on projects with ownership checks and a transactionally
//! maintained per-project comment counter.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::comments_routes;
