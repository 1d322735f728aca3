//! # Projects Module
//!
//! The project feed, project CRUD with ownership checks, screenshots, and
//! tag normalization.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod tags;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::projects_routes;
