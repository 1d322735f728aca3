// src/session_gate.rs
//! Session gating middleware for page navigation
//!
//! API routes answer with JSON errors and are never redirected; this gate
//! only steers page-level requests:
//!   - anonymous visitors are sent to `/signin` from protected pages
//!   - signed-in users who have not finished onboarding are sent to
//!     `/onboarding` from everywhere except the auth and onboarding pages
//!   - fully onboarded users are sent back to `/` from `/onboarding`

use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::resolve_request_user;
use crate::common::AppState;

/// Page prefixes that require a signed-in user
const PROTECTED_PREFIXES: &[&str] = &["/profile", "/project/upload"];

#[derive(Debug, PartialEq, Eq)]
enum GateDecision {
    Allow,
    Redirect(&'static str),
}

pub async fn session_gate(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if !is_page_path(&path) {
        return next.run(request).await;
    }

    let app_state = state_lock.read().await.clone();

    let (parts, body) = request.into_parts();
    let user = match resolve_request_user(&app_state, &parts).await {
        Ok(user) => user,
        Err(e) => return Redirect::to(e.redirect_target()).into_response(),
    };
    let request = Request::from_parts(parts, body);

    let session = user.as_ref().map(|u| u.onboarding_completed);
    match gate_decision(&path, session) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Redirect(target) => {
            debug!(path = %path, target = %target, "Session gate redirect");
            Redirect::to(target).into_response()
        }
    }
}

/// Only bare page navigations are gated; API calls, auth endpoints, served
/// uploads, and asset files pass through untouched.
fn is_page_path(path: &str) -> bool {
    if path.starts_with("/api/") || path.starts_with("/auth/") || path.starts_with("/uploads/") {
        return false;
    }
    // Asset requests carry an extension (.js, .css, .ico)
    !path.rsplit('/').next().unwrap_or("").contains('.')
}

/// `session` is `None` for anonymous visitors, otherwise the resolved user's
/// onboarding-completed flag.
fn gate_decision(path: &str, session: Option<bool>) -> GateDecision {
    match session {
        None => {
            if PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p)) {
                GateDecision::Redirect("/signin")
            } else {
                GateDecision::Allow
            }
        }
        Some(false) => {
            if path == "/onboarding" || path == "/signin" || path == "/signout" {
                GateDecision::Allow
            } else {
                GateDecision::Redirect("/onboarding")
            }
        }
        Some(true) => {
            if path == "/onboarding" {
                GateDecision::Redirect("/")
            } else {
                GateDecision::Allow
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_is_redirected_off_protected_pages() {
        assert_eq!(
            gate_decision("/profile/settings", None),
            GateDecision::Redirect("/signin")
        );
        assert_eq!(
            gate_decision("/project/upload", None),
            GateDecision::Redirect("/signin")
        );
    }

    #[test]
    fn anonymous_can_browse_public_pages() {
        assert_eq!(gate_decision("/", None), GateDecision::Allow);
        assert_eq!(gate_decision("/project/P_ABC123", None), GateDecision::Allow);
    }

    #[test]
    fn unonboarded_user_is_funneled_to_onboarding() {
        assert_eq!(
            gate_decision("/", Some(false)),
            GateDecision::Redirect("/onboarding")
        );
        assert_eq!(
            gate_decision("/profile/someone", Some(false)),
            GateDecision::Redirect("/onboarding")
        );
        assert_eq!(gate_decision("/onboarding", Some(false)), GateDecision::Allow);
    }

    #[test]
    fn onboarded_user_cannot_revisit_onboarding() {
        assert_eq!(
            gate_decision("/onboarding", Some(true)),
            GateDecision::Redirect("/")
        );
        assert_eq!(gate_decision("/", Some(true)), GateDecision::Allow);
    }

    #[test]
    fn api_and_asset_paths_are_not_gated() {
        assert!(!is_page_path("/api/projects"));
        assert!(!is_page_path("/auth/callback"));
        assert!(!is_page_path("/uploads/avatars/U_ABC123/avatar.png"));
        assert!(!is_page_path("/favicon.ico"));
        assert!(is_page_path("/profile/someone"));
    }
}
