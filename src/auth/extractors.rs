//! Authentication extractors for Axum
//!
//! `MaybeUser` resolves the request identity without failing when it is
//! absent (the absent-user signal); `AuthedUser` is the strict variant that
//! rejects with `NotLoggedIn`. User rows are created lazily on the first
//! authenticated request (upsert-on-read).

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, header::COOKIE, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use rand::Rng;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::models::{Claims, User, UserStatus, AUTH_COOKIE};
use crate::common::{safe_email_log, ApiError, AppState};

/// Authenticated user extractor for protected routes
#[derive(Debug)]
pub struct AuthedUser {
    pub user: User,
}

impl AuthedUser {
    pub fn id(&self) -> &str {
        &self.user.id
    }
}

/// Optional identity extractor
///
/// Resolves to `None` for anonymous callers and for invalid/expired tokens;
/// only infrastructure failures reject.
#[derive(Debug)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let user = resolve_request_user(&app_state, parts).await?;
        Ok(MaybeUser(user))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;

        let user = match user {
            Some(u) => u,
            None => {
                warn!("Authentication required but no identity resolved");
                return Err(ApiError::NotLoggedIn);
            }
        };

        if user.status() == UserStatus::Suspended {
            warn!(user_id = %user.id, "Suspended account attempted a protected operation");
            return Err(ApiError::InsufficientPermission(
                "Account is suspended".to_string(),
            ));
        }

        Ok(AuthedUser { user })
    }
}

/// Resolve the request's identity against the session token and user table.
pub async fn resolve_request_user(
    app_state: &AppState,
    parts: &Parts,
) -> Result<Option<User>, ApiError> {
    // DEV MODE: Bypass authentication completely
    if app_state.dev_mode.is_enabled() {
        let user = resolve_or_create_user(
            &app_state.db,
            &app_state.admin_emails,
            app_state.dev_mode.dev_identity_id(),
            &app_state.dev_mode.user_email,
            Some(&app_state.dev_mode.username),
            None,
        )
        .await?;

        let user = apply_dev_role(&app_state.db, user, &app_state.dev_mode.user_role).await?;

        debug!(
            user_id = %user.id,
            email = %safe_email_log(&user.email),
            "DEV MODE: Authentication bypassed"
        );

        return Ok(Some(user));
    }

    let token = match bearer_or_cookie_token(parts) {
        Some(t) => t,
        None => return Ok(None),
    };

    // An invalid or expired token is the same absent-user signal as no token
    let decoded = match decode::<Claims>(
        &token,
        &DecodingKey::from_secret(app_state.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    ) {
        Ok(d) => d,
        Err(e) => {
            debug!(error = %e, "JWT token validation failed");
            return Ok(None);
        }
    };

    let claims = decoded.claims;
    let user = resolve_or_create_user(
        &app_state.db,
        &app_state.admin_emails,
        &claims.sub,
        &claims.email,
        None,
        None,
    )
    .await?;

    Ok(Some(user))
}

/// Extract the session token from the Authorization header or session cookie
fn bearer_or_cookie_token(parts: &Parts) -> Option<String> {
    if let Some(header) = parts.headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        let token = header.strip_prefix("Bearer ").unwrap_or(header);
        return Some(token.to_string());
    }

    let cookies = parts.headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == AUTH_COOKIE {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Load the user record for an external identity, creating it lazily when no
/// row exists yet. Also refreshes `last_active`.
///
/// Emails listed in ADMIN_EMAILS are bootstrapped with the admin role on
/// first creation.
pub async fn resolve_or_create_user(
    db: &SqlitePool,
    admin_emails: &HashSet<String>,
    identity_id: &str,
    email: &str,
    name: Option<&str>,
    avatar_url: Option<&str>,
) -> Result<User, ApiError> {
    let existing: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(identity_id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %identity_id, "Database error during user lookup");
            ApiError::DatabaseError(e)
        })?;

    if let Some(user) = existing {
        sqlx::query("UPDATE users SET last_active = datetime('now') WHERE id = ?")
            .bind(identity_id)
            .execute(db)
            .await
            .map_err(ApiError::DatabaseError)?;
        return Ok(user);
    }

    let role = if admin_emails.contains(&email.to_lowercase()) {
        "admin"
    } else {
        "user"
    };

    let mut username = derive_username(email);

    // Retry with a random suffix when the derived username is taken
    for attempt in 0..3 {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, name, avatar_url, role, last_active)
            VALUES (?, ?, ?, ?, ?, ?, datetime('now'))
            "#,
        )
        .bind(identity_id)
        .bind(&username)
        .bind(email)
        .bind(name)
        .bind(avatar_url)
        .bind(role)
        .execute(db)
        .await;

        match result {
            Ok(_) => break,
            Err(e) if is_unique_violation(&e) && attempt < 2 => {
                username = format!("{}_{}", derive_username(email), random_suffix());
            }
            Err(e) => {
                error!(error = %e, user_id = %identity_id, "Database error creating user record");
                return Err(ApiError::DatabaseError(e));
            }
        }
    }

    debug!(
        user_id = %identity_id,
        email = %safe_email_log(email),
        role = %role,
        "User record created lazily on first authenticated request"
    );

    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(identity_id)
        .fetch_one(db)
        .await
        .map_err(ApiError::DatabaseError)
}

/// Force the dev identity onto the DEV_USER_ROLE role so admin and
/// moderator flows can be exercised locally. Unknown role strings are
/// ignored and the stored role stands.
pub(crate) async fn apply_dev_role(
    db: &SqlitePool,
    mut user: User,
    role: &str,
) -> Result<User, ApiError> {
    if !matches!(role, "user" | "moderator" | "admin") || user.role == role {
        return Ok(user);
    }

    sqlx::query("UPDATE users SET role = ? WHERE id = ?")
        .bind(role)
        .bind(&user.id)
        .execute(db)
        .await
        .map_err(ApiError::DatabaseError)?;

    debug!(user_id = %user.id, role = %role, "DEV MODE: Role override applied");
    user.role = role.to_string();
    Ok(user)
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error.as_database_error().map(|db| db.kind()),
        Some(sqlx::error::ErrorKind::UniqueViolation)
    )
}

/// Derive a provisional username from the email local part; onboarding lets
/// the user pick their real one.
fn derive_username(email: &str) -> String {
    let local = email.split('@').next().unwrap_or("user");
    let cleaned: String = local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    if cleaned.len() >= 3 {
        cleaned
    } else {
        format!("user_{}", random_suffix())
    }
}

fn random_suffix() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghjkmnpqrstvwxyz";
    let mut rng = rand::thread_rng();
    (0..4)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
