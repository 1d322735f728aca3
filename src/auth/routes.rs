//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /auth/signin` - Redirect to the auth provider
/// - `GET /auth/callback` - OAuth code exchange
/// - `POST /api/auth/logout` - Clear the session cookie
/// - `GET /api/me` - Current identity (null for anonymous)
/// - `POST /api/onboarding` - Finish onboarding
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/signin", get(handlers::signin_redirect))
        .route("/auth/callback", get(handlers::oauth_callback))
        .route("/api/auth/logout", post(handlers::logout_handler))
        .route("/api/me", get(handlers::me_handler))
        .route("/api/onboarding", post(handlers::complete_onboarding))
}
