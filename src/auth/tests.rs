//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - JWT session token round trips
//! - Role gates (admin-or-moderator vs admin-only)
//! - Ownership checks

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::ApiError;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    fn user_with_role(role: &str) -> models::User {
        models::User {
            id: "U_TEST01".to_string(),
            username: "tester".to_string(),
            email: "tester@example.com".to_string(),
            name: None,
            avatar_url: None,
            bio: None,
            role: role.to_string(),
            status: "active".to_string(),
            verified: false,
            admin_notes: None,
            onboarding_completed: true,
            last_active: None,
            created_at: "2024-01-01 00:00:00".to_string(),
            updated_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_session_token_round_trip() {
        let secret = "test_secret_key";
        let token = handlers::issue_session_token(secret, "U_TEST01", "tester@example.com")
            .expect("Failed to issue token");

        let decoded = decode::<models::Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .expect("Failed to decode token");

        assert_eq!(decoded.claims.sub, "U_TEST01");
        assert_eq!(decoded.claims.email, "tester@example.com");
    }

    #[test]
    fn test_session_token_fails_with_wrong_secret() {
        let token = handlers::issue_session_token("secret_a", "U_TEST01", "tester@example.com")
            .expect("Failed to issue token");

        let result = decode::<models::Claims>(
            &token,
            &DecodingKey::from_secret(b"secret_b"),
            &Validation::new(Algorithm::HS256),
        );

        assert!(result.is_err(), "Token must not validate under another secret");
    }

    #[test]
    fn test_admin_permission_requires_login_first() {
        // The absent-identity check runs before any role comparison
        let result = require_admin_permission(None);
        assert!(matches!(result, Err(ApiError::NotLoggedIn)));
    }

    #[test]
    fn test_admin_permission_rejects_plain_users() {
        let user = user_with_role("user");
        let result = require_admin_permission(Some(&user));
        assert!(matches!(result, Err(ApiError::NotAdmin)));
    }

    #[test]
    fn test_admin_permission_accepts_moderators_and_admins() {
        let moderator = user_with_role("moderator");
        assert!(require_admin_permission(Some(&moderator)).is_ok());

        let admin = user_with_role("admin");
        assert!(require_admin_permission(Some(&admin)).is_ok());
    }

    #[test]
    fn test_admin_only_gate_rejects_moderators() {
        let moderator = user_with_role("moderator");
        let result = require_role(Some(&moderator), RequiredRole::Admin);
        assert!(matches!(result, Err(ApiError::NotAdmin)));
    }

    #[test]
    fn test_moderator_gate_accepts_admins() {
        let admin = user_with_role("admin");
        assert!(require_role(Some(&admin), RequiredRole::Moderator).is_ok());

        let user = user_with_role("user");
        let result = require_role(Some(&user), RequiredRole::Moderator);
        assert!(matches!(result, Err(ApiError::NotModerator)));
    }

    #[test]
    fn test_unknown_role_degrades_to_user() {
        let user = user_with_role("superuser");
        assert_eq!(user.role(), UserRole::User);
        assert!(matches!(
            require_admin_permission(Some(&user)),
            Err(ApiError::NotAdmin)
        ));
    }

    #[test]
    fn test_ownership_is_orthogonal_to_roles() {
        // An admin id that is not the owner id still fails the ownership check
        assert!(require_owner("U_OWNER1", "U_OWNER1").is_ok());
        assert!(matches!(
            require_owner("U_OWNER1", "U_ADMIN1"),
            Err(ApiError::InsufficientPermission(_))
        ));
    }

    async fn test_pool() -> sqlx::SqlitePool {
        // A single connection keeps every query on the same in-memory database
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        crate::common::migrations::run_migrations(&pool)
            .await
            .expect("Migrations failed");

        sqlx::query(
            "INSERT INTO users (id, username, email) VALUES ('U_DEV000', 'devuser', 'dev@test.com')",
        )
        .execute(&pool)
        .await
        .expect("Failed to seed user");

        pool
    }

    async fn load_dev_user(pool: &sqlx::SqlitePool) -> models::User {
        sqlx::query_as::<_, models::User>("SELECT * FROM users WHERE id = 'U_DEV000'")
            .fetch_one(pool)
            .await
            .expect("Failed to load user")
    }

    #[tokio::test]
    async fn test_dev_role_override_applied_and_persisted() {
        let pool = test_pool().await;

        let user = load_dev_user(&pool).await;
        assert_eq!(user.role, "user");

        let user = extractors::apply_dev_role(&pool, user, "moderator")
            .await
            .expect("Role override failed");
        assert_eq!(user.role, "moderator");

        let stored: String = sqlx::query_scalar("SELECT role FROM users WHERE id = 'U_DEV000'")
            .fetch_one(&pool)
            .await
            .expect("Failed to read role");
        assert_eq!(stored, "moderator");
    }

    #[tokio::test]
    async fn test_dev_role_override_ignores_unknown_role() {
        let pool = test_pool().await;

        let user = load_dev_user(&pool).await;
        let user = extractors::apply_dev_role(&pool, user, "superuser")
            .await
            .expect("Unknown role must be ignored, not fail");
        assert_eq!(user.role, "user");

        let stored: String = sqlx::query_scalar("SELECT role FROM users WHERE id = 'U_DEV000'")
            .fetch_one(&pool)
            .await
            .expect("Failed to read role");
        assert_eq!(stored, "user");
    }

    #[test]
    fn test_redirect_policy() {
        assert_eq!(ApiError::NotLoggedIn.redirect_target(), "/signin");
        assert_eq!(ApiError::NotAdmin.redirect_target(), "/unauthorized");
        assert_eq!(ApiError::NotModerator.redirect_target(), "/unauthorized");
        // Conservative fallback: unmapped kinds go to sign-in
        assert_eq!(
            ApiError::UserNotFound("missing".to_string()).redirect_target(),
            "/signin"
        );
    }
}
