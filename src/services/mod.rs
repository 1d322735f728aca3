// Services module - external-facing integrations

pub mod storage;

pub use storage::{StorageError, StorageService};
