//! Configuration management for the enrollment service.
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{bail, Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL for the local store
    pub redis_url: String,

    /// API server host
    pub api_host: String,

    /// API server port
    pub api_port: u16,

    /// Whether to run fully in-memory (no Redis, no remote document API).
    /// For development and testing.
    pub mock_mode: bool,

    /// Remote document store base URL (required when not in mock mode)
    pub remote_url: Option<String>,

    /// Capacity of the background sync queue; jobs beyond it are dropped
    pub sync_queue_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),

            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8084".to_string())
                .parse()
                .context("Invalid API_PORT")?,

            mock_mode: env::var("MOCK_MODE")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("Invalid MOCK_MODE (expected true/false)")?,

            remote_url: env::var("REMOTE_STORE_URL").ok(),

            sync_queue_capacity: env::var("SYNC_QUEUE_CAPACITY")
                .unwrap_or_else(|_| "64".to_string())
                .parse()
                .context("Invalid SYNC_QUEUE_CAPACITY")?,
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.mock_mode && self.remote_url.is_none() {
            bail!("REMOTE_STORE_URL is required when MOCK_MODE=false");
        }
        if self.sync_queue_capacity == 0 {
            bail!("SYNC_QUEUE_CAPACITY must be at least 1");
        }
        Ok(())
    }
}
