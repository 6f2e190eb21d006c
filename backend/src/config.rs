use std::env;

use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number, got {0:?}")]
    InvalidPort(String),
    #[error("DISPLAY_TIMEZONE is not a known timezone: {0:?}")]
    InvalidTimezone(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub static_files_path: String,
    /// Zone in which "today" is resolved
    pub timezone: Tz,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let timezone = env::var("DISPLAY_TIMEZONE").unwrap_or_else(|_| "Asia/Kolkata".to_string());

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: port.parse().map_err(|_| ConfigError::InvalidPort(port.clone()))?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:todo.db?mode=rwc".to_string()),
            static_files_path: env::var("STATIC_FILES_PATH")
                .unwrap_or_else(|_| "./static".to_string()),
            timezone: timezone
                .parse()
                .map_err(|_| ConfigError::InvalidTimezone(timezone.clone()))?,
        })
    }
}
