//! Client for the document extraction service.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use lessonforge_core::models::MimeCategory;
use lessonforge_core::StudioConfig;

/// Server-side text extraction backend.
#[async_trait]
pub trait RemoteExtractor: Send + Sync {
    /// Extract text from the file contents.
    async fn extract_text(
        &self,
        file_name: &str,
        category: MimeCategory,
        data: &[u8],
    ) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    file_name: &'a str,
    category: MimeCategory,
    data: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    text: String,
}

/// HTTP client for the extraction service.
pub struct HttpRemoteExtractor {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRemoteExtractor {
    pub fn new(base_url: String, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &StudioConfig) -> Result<Self> {
        Self::new(
            config.extraction_base_url.clone(),
            config.extraction_api_key.clone(),
            config.extraction_timeout_secs,
        )
    }
}

#[async_trait]
impl RemoteExtractor for HttpRemoteExtractor {
    async fn extract_text(
        &self,
        file_name: &str,
        category: MimeCategory,
        data: &[u8],
    ) -> Result<String> {
        let request = ExtractRequest {
            file_name,
            category,
            data: base64::engine::general_purpose::STANDARD.encode(data),
        };

        let url = format!("{}/v1/extract", self.base_url);
        let mut builder = self.http_client.post(&url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("x-api-key", api_key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send extraction request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Extraction service error: {} - {}", status, error_text);
        }

        let extract_response: ExtractResponse = response
            .json()
            .await
            .context("Failed to parse extraction response")?;

        Ok(extract_response.text)
    }
}
