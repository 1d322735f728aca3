//! Authentication handlers
//!
//! OAuth code exchange against the external provider, JWT/session cookie
//! issuance, current-identity lookup, and onboarding completion.

use axum::{
    extract::{Extension, Query},
    http::{header::SET_COOKIE, HeaderMap},
    response::Redirect,
    Json,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::extractors::{is_unique_violation, resolve_or_create_user, AuthedUser, MaybeUser};
use super::models::{
    CallbackQuery, Claims, OnboardingRequest, TokenResponse, UserinfoPayload, AUTH_COOKIE,
};
use crate::common::{safe_email_log, ApiError, AppState};
use crate::users::validators::validate_username;

const SESSION_TTL_SECS: usize = 7 * 24 * 60 * 60;

/// GET /auth/signin - Redirect to the external auth provider
pub async fn signin_redirect(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Redirect, ApiError> {
    let state = state_lock.read().await.clone();

    let oauth = state
        .oauth
        .as_ref()
        .ok_or_else(|| ApiError::InternalServer("OAuth provider not configured".to_string()))?;

    let auth_url = format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope=openid%20email%20profile",
        oauth.authorize_url,
        urlencoding::encode(&oauth.client_id),
        urlencoding::encode(&oauth.redirect_url),
    );

    info!("Redirecting to auth provider");
    Ok(Redirect::to(&auth_url))
}

/// GET /auth/callback - Exchange the authorization code for a session
///
/// Exchanges the code at the provider's token endpoint, resolves the
/// identity, creates the user record on first login (onboarding not yet
/// completed), and sets the session cookie on the redirect response.
pub async fn oauth_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(query): Query<CallbackQuery>,
) -> Result<(HeaderMap, Redirect), ApiError> {
    let state = state_lock.read().await.clone();

    let oauth = state
        .oauth
        .as_ref()
        .ok_or_else(|| ApiError::InternalServer("OAuth provider not configured".to_string()))?;

    info!("Received OAuth callback with authorization code");

    let token_response: TokenResponse = state
        .http
        .post(&oauth.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", query.code.as_str()),
            ("client_id", oauth.client_id.as_str()),
            ("client_secret", oauth.client_secret.as_str()),
            ("redirect_uri", oauth.redirect_url.as_str()),
        ])
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, "Token endpoint request failed");
            ApiError::InternalServer("Failed to exchange authorization code".to_string())
        })?
        .json()
        .await
        .map_err(|e| {
            error!(error = %e, "Token endpoint returned an unexpected payload");
            ApiError::InternalServer("Failed to exchange authorization code".to_string())
        })?;

    let userinfo: UserinfoPayload = state
        .http
        .get(&oauth.userinfo_url)
        .bearer_auth(&token_response.access_token)
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, "Userinfo request failed");
            ApiError::InternalServer("Failed to resolve identity".to_string())
        })?
        .json()
        .await
        .map_err(|e| {
            error!(error = %e, "Userinfo returned an unexpected payload");
            ApiError::InternalServer("Failed to resolve identity".to_string())
        })?;

    let identity_id = userinfo
        .identity_id()
        .ok_or_else(|| ApiError::InternalServer("Provider returned no identity id".to_string()))?
        .to_string();

    let user = resolve_or_create_user(
        &state.db,
        &state.admin_emails,
        &identity_id,
        &userinfo.email,
        userinfo.name.as_deref(),
        userinfo.picture.as_deref(),
    )
    .await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        onboarding_completed = user.onboarding_completed,
        "User authentication successful via OAuth"
    );

    let token = issue_session_token(&state.jwt_secret, &user.id, &user.email)?;

    let mut headers = HeaderMap::new();
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        AUTH_COOKIE, token, SESSION_TTL_SECS
    );
    headers.insert(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| ApiError::InternalServer("Failed to build session cookie".to_string()))?,
    );

    let target = if user.onboarding_completed {
        "/"
    } else {
        "/onboarding"
    };

    Ok((headers, Redirect::to(target)))
}

/// GET /api/me - Current identity, or `user: null` for anonymous callers
///
/// Absence is a signal here, not an error, matching the gate contract.
pub async fn me_handler(MaybeUser(user): MaybeUser) -> Json<serde_json::Value> {
    match user {
        Some(user) => Json(serde_json::json!({ "user": user })),
        None => Json(serde_json::json!({ "user": null })),
    }
}

/// POST /api/auth/logout - Clear the session cookie
pub async fn logout_handler(_authed: AuthedUser) -> Result<(HeaderMap, Json<serde_json::Value>), ApiError> {
    info!("User logout successful");

    let mut headers = HeaderMap::new();
    let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", AUTH_COOKIE);
    headers.insert(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| ApiError::InternalServer("Failed to build session cookie".to_string()))?,
    );

    Ok((headers, Json(serde_json::json!({ "message": "Logout successful" }))))
}

/// POST /api/onboarding - Pick a username and finish onboarding
pub async fn complete_onboarding(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<OnboardingRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = validate_username(&request.username);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    if let Some(bio) = &request.bio {
        if bio.chars().count() > 500 {
            return Err(ApiError::ValidationError(
                "bio: Bio must be less than 500 characters".to_string(),
            ));
        }
    }

    let result = sqlx::query(
        r#"
        UPDATE users
        SET username = ?,
            bio = COALESCE(?, bio),
            onboarding_completed = 1,
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&request.username)
    .bind(request.bio.as_deref())
    .bind(authed.id())
    .execute(&state.db)
    .await;

    match result {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            warn!(
                user_id = %authed.id(),
                username = %request.username,
                "Onboarding failed: username already taken"
            );
            return Err(ApiError::ValidationError(
                "username: Username is already taken".to_string(),
            ));
        }
        Err(e) => {
            error!(error = %e, user_id = %authed.id(), "Database error completing onboarding");
            return Err(ApiError::DatabaseError(e));
        }
    }

    info!(
        user_id = %authed.id(),
        username = %request.username,
        "Onboarding completed"
    );

    Ok(Json(serde_json::json!({ "message": "Onboarding completed" })))
}

/// Create a signed session token for a user id
pub fn issue_session_token(jwt_secret: &str, user_id: &str, email: &str) -> Result<String, ApiError> {
    let exp = chrono::Utc::now().timestamp() as usize + SESSION_TTL_SECS;
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, "Failed to sign session token");
        ApiError::InternalServer("Failed to create session".to_string())
    })
}
