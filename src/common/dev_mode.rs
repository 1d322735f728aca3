// src/common/dev_mode.rs
//! Development mode configuration and utilities
//! Allows bypassing authentication for testing purposes

use std::env;

#[derive(Debug, Clone)]
pub struct DevModeConfig {
    pub enabled: bool,
    pub user_email: String,
    pub username: String,
    pub user_role: String,
}

impl DevModeConfig {
    pub fn from_env() -> Self {
        let enabled = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        let user_email = env::var("DEV_USER_EMAIL").unwrap_or_else(|_| "dev@test.com".to_string());

        let username = env::var("DEV_USERNAME").unwrap_or_else(|_| "devuser".to_string());

        let user_role = env::var("DEV_USER_ROLE").unwrap_or_else(|_| "user".to_string());

        Self {
            enabled,
            user_email,
            username,
            user_role,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Fixed identity id for dev mode so lookups stay consistent across requests
    pub fn dev_identity_id(&self) -> &'static str {
        "U_DEV000"
    }
}

/// Print dev mode status on startup
pub fn print_dev_mode_status(config: &DevModeConfig) {
    if config.enabled {
        println!("⚠️  🔓 DEV MODE ENABLED 🔓 ⚠️");
        println!("   Authentication bypassed for testing");
        println!(
            "   Dev User: {} ({}) role={}",
            config.username, config.user_email, config.user_role
        );
        println!("   DO NOT use in production!");
    }
}
