//! Like data models

use serde::{Deserialize, Serialize};

/// Authoritative toggle result returned to clients
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: i64,
}
