use lessonforge_core::AppError;

/// Validation and extraction errors for uploaded source files
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Unsupported content type: {content_type} (allowed: {allowed:?})")]
    UnsupportedContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(#[source] anyhow::Error),

    #[error("No text content found in file")]
    EmptyExtraction,
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::FileTooLarge { size, max } => AppError::FileTooLarge {
                size_bytes: size as u64,
                max_bytes: max as u64,
            },
            IngestError::UnsupportedContentType {
                content_type,
                allowed,
            } => AppError::InvalidFileType(format!(
                "{} (allowed: {})",
                content_type,
                allowed.join(", ")
            )),
            IngestError::InvalidFilename(name) => {
                AppError::InvalidInput(format!("Invalid filename: {}", name))
            }
            IngestError::EmptyFile => AppError::InvalidInput("Uploaded file is empty".to_string()),
            IngestError::ExtractionFailed(e) => AppError::ExtractionFailed(e.to_string()),
            IngestError::EmptyExtraction => {
                AppError::ExtractionFailed("no text content could be extracted".to_string())
            }
        }
    }
}
