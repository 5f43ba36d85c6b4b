//! Configuration module
//!
//! This module provides the runtime configuration for the generation studio:
//! source ingestion limits plus the endpoints of the extraction and
//! generation services.

use std::env;

/// Application configuration loaded from the environment
#[derive(Clone, Debug)]
pub struct StudioConfig {
    pub environment: String,
    // Source ingestion configuration
    pub max_source_size_bytes: usize,
    // Extraction service (server-side text extraction tier)
    pub extraction_base_url: String,
    pub extraction_api_key: Option<String>,
    pub extraction_timeout_secs: u64,
    // Generation service
    pub generation_base_url: String,
    pub generation_api_key: Option<String>,
    pub generation_model: String,
    pub generation_timeout_secs: u64,
}

impl StudioConfig {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase().eq("production") || self.environment.to_lowercase().eq("prod")
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        const MAX_SOURCE_SIZE_MB: usize = 10;
        const EXTRACTION_TIMEOUT_SECS: u64 = 30;
        const GENERATION_TIMEOUT_SECS: u64 = 120;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_source_size_mb = env::var("MAX_SOURCE_SIZE_MB")
            .unwrap_or_else(|_| MAX_SOURCE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_SOURCE_SIZE_MB);

        let config = StudioConfig {
            environment,
            max_source_size_bytes: max_source_size_mb * 1024 * 1024,
            extraction_base_url: env::var("EXTRACTION_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:7700".to_string()),
            extraction_api_key: env::var("EXTRACTION_SERVICE_API_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            extraction_timeout_secs: env::var("EXTRACTION_TIMEOUT_SECS")
                .unwrap_or_else(|_| EXTRACTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(EXTRACTION_TIMEOUT_SECS),
            generation_base_url: env::var("GENERATION_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:7800".to_string()),
            generation_api_key: env::var("GENERATION_SERVICE_API_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".to_string()),
            generation_timeout_secs: env::var("GENERATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| GENERATION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(GENERATION_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_source_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_SOURCE_SIZE_MB must be greater than 0"));
        }

        if !self.extraction_base_url.starts_with("http") {
            return Err(anyhow::anyhow!(
                "EXTRACTION_SERVICE_URL must be an http(s) URL"
            ));
        }

        if !self.generation_base_url.starts_with("http") {
            return Err(anyhow::anyhow!(
                "GENERATION_SERVICE_URL must be an http(s) URL"
            ));
        }

        if self.is_production() && self.generation_api_key.is_none() {
            return Err(anyhow::anyhow!(
                "GENERATION_SERVICE_API_KEY must be set in production"
            ));
        }

        Ok(())
    }
}
