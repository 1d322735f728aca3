// Admin module handlers

pub mod dashboard;
pub mod projects;
pub mod users;
