//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Name of the session cookie carrying the JWT
pub const AUTH_COOKIE: &str = "vivvers_token";

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

/// Stored user role. Closed set; unknown strings degrade to `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Moderator,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Moderator => "moderator",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "admin" => UserRole::Admin,
            "moderator" => UserRole::Moderator,
            _ => UserRole::User,
        }
    }
}

/// Stored account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "suspended" => UserStatus::Suspended,
            _ => UserStatus::Active,
        }
    }
}

/// User database model
///
/// `id` is immutable and equals the external identity's id. `role` and
/// `status` are stored as text; use [`User::role`] / [`User::status`] for the
/// typed view.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub status: String,
    pub verified: bool,
    pub admin_notes: Option<String>,
    pub onboarding_completed: bool,
    pub last_active: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn role(&self) -> UserRole {
        UserRole::parse(&self.role)
    }

    pub fn status(&self) -> UserStatus {
        UserStatus::parse(&self.status)
    }
}

/// OAuth token endpoint response
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// OAuth userinfo payload
///
/// Providers disagree on the id field name, so both `sub` and `id` are
/// accepted.
#[derive(Deserialize)]
pub struct UserinfoPayload {
    pub sub: Option<String>,
    pub id: Option<String>,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl UserinfoPayload {
    pub fn identity_id(&self) -> Option<&str> {
        self.sub.as_deref().or(self.id.as_deref())
    }
}

/// OAuth callback query parameters
#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: String,
}

/// Onboarding completion request
#[derive(Deserialize)]
pub struct OnboardingRequest {
    pub username: String,
    pub bio: Option<String>,
}
