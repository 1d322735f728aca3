// Users module handlers

pub mod avatar;
pub mod profile;
