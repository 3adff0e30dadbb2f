//! Configuration management for the admin portal
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, configured once per deployment
    pub api_url: String,

    /// Directory holding the persisted session record
    pub session_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            api_url: env::var("PORTAL_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string()),

            session_dir: env::var("PORTAL_SESSION_DIR")
                .unwrap_or_else(|_| "./.krishi-session".to_string())
                .into(),
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Replace the backend URL, e.g. from a command line flag
    pub fn with_api_url(mut self, api_url: String) -> Result<Self> {
        self.api_url = api_url;
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            anyhow::bail!("PORTAL_API_URL must be an http(s) URL, got {:?}", self.api_url);
        }

        if self.session_dir.as_os_str().is_empty() {
            anyhow::bail!("PORTAL_SESSION_DIR must not be empty");
        }

        Ok(())
    }

    /// Ensure the session directory exists
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.session_dir).with_context(|| {
            format!(
                "Failed to create session directory: {}",
                self.session_dir.display()
            )
        })
    }
}
