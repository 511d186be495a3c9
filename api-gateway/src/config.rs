//! Application configuration

use std::env;

use account_service::AccountServiceConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listening address
    pub addr: String,
    /// Enable debug logging
    pub debug: bool,
    /// Account storage settings
    pub accounts: AccountServiceConfig,
}

impl AppConfig {
    /// Create a new configuration from environment variables
    pub fn new() -> Self {
        Self {
            addr: env::var("ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            debug: env::var("DEBUG").map(|v| v == "1").unwrap_or(false),
            accounts: AccountServiceConfig::from_env(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
