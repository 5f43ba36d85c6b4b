//! Ingestion dispatcher: validates an upload, then routes it to the right
//! extraction strategy for its category.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use lessonforge_core::models::{ExtractionMethod, MimeCategory, UploadedSource};

use crate::error::IngestError;
use crate::extract::{local, RemoteExtractor};
use crate::validator::SourceValidator;

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Routes validated uploads to an extraction strategy.
pub struct IngestDispatcher {
    validator: SourceValidator,
    remote: Arc<dyn RemoteExtractor>,
}

impl IngestDispatcher {
    pub fn new(validator: SourceValidator, remote: Arc<dyn RemoteExtractor>) -> Self {
        Self { validator, remote }
    }

    /// Validate an upload and extract its text content.
    ///
    /// Validation failures return before any extraction work happens. PDFs
    /// are parsed in-process first and fall back to the extraction service
    /// when local parsing fails or yields no text.
    pub async fn ingest(&self, file: SourceFile) -> Result<UploadedSource, IngestError> {
        let category = self
            .validator
            .validate_all(&file.file_name, &file.content_type, &file.data)?;

        let (text, method) = match category {
            MimeCategory::Pdf => self.extract_pdf(&file).await?,
            MimeCategory::Ppt | MimeCategory::Image => {
                let text = self.extract_remote(&file, category).await?;
                (text, ExtractionMethod::Server)
            }
            MimeCategory::Text => {
                let text =
                    local::read_plain_text(&file.data).map_err(IngestError::ExtractionFailed)?;
                (text, ExtractionMethod::Client)
            }
        };

        if text.trim().is_empty() {
            return Err(IngestError::EmptyExtraction);
        }

        info!(
            file_name = %file.file_name,
            category = %category,
            method = %method,
            text_len = text.len(),
            "Source file ingested"
        );

        Ok(UploadedSource::new(
            file.file_name,
            file.data.len() as u64,
            category,
            text,
            method,
        ))
    }

    async fn extract_pdf(
        &self,
        file: &SourceFile,
    ) -> Result<(String, ExtractionMethod), IngestError> {
        match local::extract_pdf_text(&file.data) {
            Ok(text) if !text.trim().is_empty() => Ok((text, ExtractionMethod::Client)),
            Ok(_) => {
                warn!(
                    file_name = %file.file_name,
                    "Local PDF parse produced no text, falling back to extraction service"
                );
                let text = self.extract_remote(file, MimeCategory::Pdf).await?;
                Ok((text, ExtractionMethod::Server))
            }
            Err(e) => {
                warn!(
                    file_name = %file.file_name,
                    error = %e,
                    "Local PDF parse failed, falling back to extraction service"
                );
                let text = self.extract_remote(file, MimeCategory::Pdf).await?;
                Ok((text, ExtractionMethod::Server))
            }
        }
    }

    async fn extract_remote(
        &self,
        file: &SourceFile,
        category: MimeCategory,
    ) -> Result<String, IngestError> {
        self.remote
            .extract_text(&file.file_name, category, &file.data)
            .await
            .map_err(IngestError::ExtractionFailed)
    }
}
