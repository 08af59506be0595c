use std::env;

use dotenvy::dotenv;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Largest accepted upload: 10 MiB.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationErrors),
}

#[derive(Debug, Clone, Validate)]
pub struct Config {
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(length(min = 1))]
    pub database_url: String,
    /// Directory the uploaded documents are written to
    #[validate(length(min = 1))]
    pub upload_dir: String,
    #[validate(range(min = 1, max = 10485760))] // Max 10MB
    pub max_file_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: "sqlite://db.sqlite3".to_string(),
            upload_dir: "uploads".to_string(),
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load environment variables from `.env` file (if it exists)
        dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidVar { name: "PORT", value })?,
            None => defaults.port,
        };

        let config = Config {
            port,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            upload_dir: lookup("UPLOAD_DIR").unwrap_or(defaults.upload_dir),
            max_file_size: defaults.max_file_size,
        };

        config.validate()?;
        Ok(config)
    }
}
