//! User-facing profile models

use serde::{Deserialize, Serialize};

use crate::auth::User;

/// PUT /api/profile request body
#[derive(Deserialize, Debug)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// Public view of a user, stripped of moderation-only fields
#[derive(Serialize, Debug)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub verified: bool,
    pub created_at: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            avatar_url: user.avatar_url,
            bio: user.bio,
            verified: user.verified,
            created_at: user.created_at,
        }
    }
}

/// GET /api/users/check-username query
#[derive(Deserialize)]
pub struct CheckUsernameQuery {
    pub username: String,
}

/// Username availability response
#[derive(Serialize)]
pub struct UsernameAvailability {
    pub username: String,
    pub available: bool,
}

/// Avatar upload response
#[derive(Serialize)]
pub struct AvatarUploadResponse {
    pub avatar_url: String,
    pub message: String,
}
