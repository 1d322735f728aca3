// Projects module handlers

pub mod manage;
pub mod public;
pub mod screenshots;
