//! Tests for likes module
//!
//! DB-backed tests run against an in-memory SQLite pool and verify the
//! toggle transaction's invariants; the optimistic-control tests verify the
//! client protocol (redirect for anonymous, single in-flight request,
//! rollback on failure).

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::auth::extractors::is_unique_violation;
    use crate::common::migrations::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    async fn test_pool() -> SqlitePool {
        // A single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        run_migrations(&pool).await.expect("Migrations failed");

        sqlx::query(
            "INSERT INTO users (id, username, email) VALUES ('U_TEST01', 'tester', 't@example.com')",
        )
        .execute(&pool)
        .await
        .expect("Failed to seed user");

        sqlx::query(
            r#"
            INSERT INTO projects (id, user_id, title, description, category)
            VALUES ('P_TEST01', 'U_TEST01', 'Test Project', 'A test project', 'web')
            "#,
        )
        .execute(&pool)
        .await
        .expect("Failed to seed project");

        sqlx::query(
            r#"
            INSERT INTO comments (id, project_id, user_id, content)
            VALUES ('C_TEST01', 'P_TEST01', 'U_TEST01', 'First!')
            "#,
        )
        .execute(&pool)
        .await
        .expect("Failed to seed comment");

        pool
    }

    async fn project_like_rows(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM project_likes WHERE project_id = 'P_TEST01'")
            .fetch_one(pool)
            .await
            .expect("Failed to count likes")
    }

    async fn project_like_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT like_count FROM projects WHERE id = 'P_TEST01'")
            .fetch_one(pool)
            .await
            .expect("Failed to read counter")
    }

    // ============================================================================
    // Toggle Transaction
    // ============================================================================

    #[tokio::test]
    async fn test_first_toggle_likes_and_increments() {
        let pool = test_pool().await;

        let status = handlers::toggle_project_like(&pool, "U_TEST01", "P_TEST01")
            .await
            .expect("Toggle failed");

        assert!(status.liked);
        assert_eq!(status.like_count, 1);
        assert_eq!(project_like_rows(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_double_toggle_returns_to_original_pair() {
        let pool = test_pool().await;

        let first = handlers::toggle_project_like(&pool, "U_TEST01", "P_TEST01")
            .await
            .expect("First toggle failed");
        assert_eq!(
            (first.liked, first.like_count),
            (true, 1)
        );

        let second = handlers::toggle_project_like(&pool, "U_TEST01", "P_TEST01")
            .await
            .expect("Second toggle failed");

        // Even number of toggles restores the original state
        assert_eq!((second.liked, second.like_count), (false, 0));
        assert_eq!(project_like_rows(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_counter_matches_persisted_like_rows() {
        let pool = test_pool().await;

        sqlx::query(
            "INSERT INTO users (id, username, email) VALUES ('U_TEST02', 'other', 'o@example.com')",
        )
        .execute(&pool)
        .await
        .expect("Failed to seed second user");

        handlers::toggle_project_like(&pool, "U_TEST01", "P_TEST01")
            .await
            .expect("Toggle failed");
        handlers::toggle_project_like(&pool, "U_TEST02", "P_TEST01")
            .await
            .expect("Toggle failed");
        handlers::toggle_project_like(&pool, "U_TEST01", "P_TEST01")
            .await
            .expect("Toggle failed");

        // likeCount == count(likes where target = this) after every toggle
        assert_eq!(project_like_count(&pool).await, project_like_rows(&pool).await);
        assert_eq!(project_like_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_comment_like_toggle() {
        let pool = test_pool().await;

        let status = handlers::toggle_comment_like(&pool, "U_TEST01", "C_TEST01")
            .await
            .expect("Toggle failed");
        assert!(status.liked);
        assert_eq!(status.like_count, 1);

        let counter: i64 = sqlx::query_scalar("SELECT like_count FROM comments WHERE id = 'C_TEST01'")
            .fetch_one(&pool)
            .await
            .expect("Failed to read counter");
        assert_eq!(counter, 1);
    }

    #[tokio::test]
    async fn test_toggle_on_missing_target_is_not_found() {
        let pool = test_pool().await;

        let result = handlers::toggle_project_like(&pool, "U_TEST01", "P_MISSING").await;
        assert!(matches!(result, Err(crate::common::ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_like_insert_hits_unique_backstop() {
        let pool = test_pool().await;

        sqlx::query(
            "INSERT INTO project_likes (id, user_id, project_id) VALUES ('K_AAAAA1', 'U_TEST01', 'P_TEST01')",
        )
        .execute(&pool)
        .await
        .expect("First insert failed");

        let err = sqlx::query(
            "INSERT INTO project_likes (id, user_id, project_id) VALUES ('K_AAAAA2', 'U_TEST01', 'P_TEST01')",
        )
        .execute(&pool)
        .await
        .expect_err("Second insert must violate the unique constraint");

        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_racing_duplicate_insert_settles_as_already_liked() {
        let pool = test_pool().await;

        // The like row already exists with a stale counter, as if a racing
        // toggle from the same user won the insert after our existence check
        sqlx::query(
            "INSERT INTO project_likes (id, user_id, project_id) VALUES ('K_AAAAA1', 'U_TEST01', 'P_TEST01')",
        )
        .execute(&pool)
        .await
        .expect("Failed to seed like row");

        let mut tx = pool.begin().await.expect("Failed to open transaction");
        handlers::insert_like(&mut tx, "U_TEST01", "P_TEST01", handlers::LikeTarget::Project)
            .await
            .expect("Duplicate insert must settle as already liked, not fail");
        tx.commit().await.expect("Failed to commit transaction");

        // Counter reconciled from the authoritative row count, no duplicate row
        assert_eq!(project_like_rows(&pool).await, 1);
        assert_eq!(project_like_count(&pool).await, 1);
    }

    // ============================================================================
    // Optimistic Control
    // ============================================================================

    #[test]
    fn test_anonymous_activation_redirects_without_request() {
        let mut control = LikeToggleControl::new(false, 3);

        let action = control.activate(false);

        assert_eq!(action, Activation::RedirectToSignin);
        assert!(!control.is_pending(), "No request may be in flight");
        assert_eq!(control.snapshot(), LikeSnapshot::new(false, 3));
    }

    #[test]
    fn test_activation_flips_optimistically() {
        let mut control = LikeToggleControl::new(false, 3);

        let action = control.activate(true);

        assert_eq!(action, Activation::SendToggle(LikeSnapshot::new(true, 4)));
        assert!(control.is_pending());
        assert_eq!(control.snapshot(), LikeSnapshot::new(true, 4));
    }

    #[test]
    fn test_rapid_clicks_send_exactly_one_request() {
        let mut control = LikeToggleControl::new(false, 3);

        let actions = [
            control.activate(true),
            control.activate(true),
            control.activate(true),
        ];

        let sent = actions
            .iter()
            .filter(|a| matches!(a, Activation::SendToggle(_)))
            .count();
        assert_eq!(sent, 1, "Only the first click may issue a request");
        assert_eq!(actions[1], Activation::Ignored);
        assert_eq!(actions[2], Activation::Ignored);
    }

    #[test]
    fn test_success_adopts_server_pair() {
        let mut control = LikeToggleControl::new(false, 3);
        control.activate(true);

        // The shared counter moved concurrently; server answer wins
        control.settle_success(LikeSnapshot::new(true, 7));

        assert!(!control.is_pending());
        assert_eq!(control.snapshot(), LikeSnapshot::new(true, 7));
    }

    #[test]
    fn test_failure_rolls_back_to_pre_toggle_state() {
        let mut control = LikeToggleControl::new(true, 5);
        let action = control.activate(true);
        assert_eq!(action, Activation::SendToggle(LikeSnapshot::new(false, 4)));

        let restored = control.settle_failure();

        assert_eq!(restored, LikeSnapshot::new(true, 5));
        assert_eq!(control.snapshot(), LikeSnapshot::new(true, 5));
        assert!(!control.is_pending());
    }

    #[test]
    fn test_control_can_toggle_again_after_settling() {
        let mut control = LikeToggleControl::new(false, 0);

        control.activate(true);
        control.settle_success(LikeSnapshot::new(true, 1));

        let action = control.activate(true);
        assert_eq!(action, Activation::SendToggle(LikeSnapshot::new(false, 0)));
    }

    #[test]
    fn test_optimistic_count_never_goes_negative() {
        // A stale zero count being unliked must clamp, not underflow
        let mut control = LikeToggleControl::new(true, 0);
        let action = control.activate(true);
        assert_eq!(action, Activation::SendToggle(LikeSnapshot::new(false, 0)));
    }
}
