// Application state shared across all modules

use reqwest::Client;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;

use crate::common::dev_mode::DevModeConfig;
use crate::services::StorageService;

/// OAuth provider endpoints and credentials
#[derive(Clone, Debug)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub redirect_url: String,
}

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub http: Client,
    pub jwt_secret: String,
    pub oauth: Option<OAuthConfig>,
    pub admin_emails: HashSet<String>,
    pub dev_mode: DevModeConfig,
    pub storage: Arc<StorageService>,
}
