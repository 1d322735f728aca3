// src/main.rs
use axum::{extract::Extension, middleware, Router};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod admin;
mod auth;
mod comments;
mod common;
mod likes;
mod logging_middleware;
mod projects;
mod services;
mod session_gate;
mod users;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::dev_mode::{print_dev_mode_status, DevModeConfig};
use common::{AppState, OAuthConfig};
use services::StorageService;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://vivvers.db".to_string());
    let uploads_dir = env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string());
    let public_base_url =
        env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let jwt_secret =
        env::var("JWT_SECRET").unwrap_or_else(|_| "replace_with_strong_secret".to_string());

    let oauth = load_oauth_config();
    if oauth.is_none() {
        warn!("OAuth is not configured; sign-in only works in dev mode");
    }

    // Parse admin emails from comma-separated env var
    let admin_emails: HashSet<String> = env::var("ADMIN_EMAILS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    info!("Loaded {} admin email(s)", admin_emails.len());

    // ========================================================================
    // DEV MODE CONFIGURATION
    // ========================================================================

    let dev_mode = DevModeConfig::from_env();
    print_dev_mode_status(&dev_mode);

    // ========================================================================
    // DIRECTORY SETUP
    // ========================================================================

    tokio::fs::create_dir_all(&uploads_dir).await?;
    tokio::fs::create_dir_all(format!("{}/avatars", uploads_dir)).await?;
    tokio::fs::create_dir_all(format!("{}/screenshots", uploads_dir)).await?;

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    // Run database migrations
    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = Client::builder().no_proxy().build()?;

    let storage = Arc::new(StorageService::new(
        PathBuf::from(&uploads_dir),
        public_base_url,
    ));
    info!("StorageService initialized at {}", uploads_dir);

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        db: pool,
        http: http_client,
        jwt_secret,
        oauth,
        admin_emails,
        dev_mode,
        storage,
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = Router::new()
        // ====================================================================
        // AUTHENTICATION ROUTES (Signin, Callback, Session, Onboarding)
        // ====================================================================
        .merge(auth::auth_routes())
        // ====================================================================
        // USER ROUTES (Public Profiles, Own Profile, Avatar)
        // ====================================================================
        .merge(users::users_routes())
        // ====================================================================
        // PROJECT ROUTES (Feed, Detail, CRUD, Screenshots, Tags)
        // ====================================================================
        .merge(projects::projects_routes())
        // ====================================================================
        // COMMENT ROUTES
        // ====================================================================
        .merge(comments::comments_routes())
        // ====================================================================
        // LIKE ROUTES (Projects and Comments)
        // ====================================================================
        .merge(likes::likes_routes())
        // ====================================================================
        // ADMIN ROUTES (Dashboard, Users, Projects)
        // ====================================================================
        .merge(admin::admin_routes())
        // ====================================================================
        // UPLOADED OBJECTS (Avatars, Screenshots)
        // ====================================================================
        .nest_service("/uploads", ServeDir::new(&uploads_dir))
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        // Add request/response body logging in debug mode
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(middleware::from_fn(session_gate::session_gate))
        .layer(Extension(shared.clone()))
        .layer({
            // Get CORS origins from environment variable
            let cors_origins = std::env::var("CORS_ORIGINS").unwrap_or_else(|_| {
                "http://localhost:3000,http://localhost:5173".to_string()
            });

            let origins: Vec<axum::http::HeaderValue> = cors_origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
                .allow_credentials(true)
        })
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// All OAUTH_* variables must be present for OAuth to be considered
/// configured; a partial set is treated as unconfigured.
fn load_oauth_config() -> Option<OAuthConfig> {
    Some(OAuthConfig {
        client_id: env::var("OAUTH_CLIENT_ID").ok()?,
        client_secret: env::var("OAUTH_CLIENT_SECRET").ok()?,
        authorize_url: env::var("OAUTH_AUTHORIZE_URL").ok()?,
        token_url: env::var("OAUTH_TOKEN_URL").ok()?,
        userinfo_url: env::var("OAUTH_USERINFO_URL").ok()?,
        redirect_url: env::var("OAUTH_REDIRECT_URL").ok()?,
    })
}
