//! Error types module
//!
//! This module provides the core error types used throughout the Lessonforge
//! application. All errors are unified under the `AppError` enum which can
//! represent validation, ingestion, quota, pipeline, and lifecycle errors.

use uuid::Uuid;

use crate::models::StepName;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "EXTRACTION_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("File too large: {size_bytes} bytes exceeds limit of {max_bytes} bytes")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Insufficient quota: {0}")]
    InsufficientQuota(String),

    #[error("Generation failed at step {step}: {message}")]
    GenerationFailed { step: StepName, message: String },

    #[error("Precondition failed: {operation} requires status {required}, artifact is {actual}")]
    PreconditionFailed {
        operation: String,
        required: String,
        actual: String,
    },

    #[error("Generation already in progress for artifact {0}")]
    AlreadyInProgress(Uuid),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

// Error conversion implementations following Rust best practices
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
/// Reduces duplication in ErrorMetadata impl; client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::MissingRequiredField(_) => (
            400,
            "MISSING_REQUIRED_FIELD",
            false,
            Some("Provide the missing field and resubmit"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidFileType(_) => (
            415,
            "INVALID_FILE_TYPE",
            false,
            Some("Upload a supported file type"),
            false,
            LogLevel::Debug,
        ),
        AppError::FileTooLarge { .. } => (
            413,
            "FILE_TOO_LARGE",
            false,
            Some("Reduce file size and upload again"),
            false,
            LogLevel::Debug,
        ),
        AppError::ExtractionFailed(_) => (
            422,
            "EXTRACTION_FAILED",
            true,
            Some("Retry the upload or try a different file"),
            true,
            LogLevel::Warn,
        ),
        AppError::InsufficientQuota(_) => (
            402,
            "INSUFFICIENT_QUOTA",
            false,
            Some("Upgrade plan or wait for quota reset"),
            false,
            LogLevel::Warn,
        ),
        AppError::GenerationFailed { .. } => (
            502,
            "GENERATION_FAILED",
            true,
            Some("Retry generation after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::PreconditionFailed { .. } => (
            409,
            "PRECONDITION_FAILED",
            false,
            Some("Check artifact status before retrying"),
            false,
            LogLevel::Debug,
        ),
        AppError::AlreadyInProgress(_) => (
            409,
            "ALREADY_IN_PROGRESS",
            false,
            Some("Wait for the current run to finish"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the artifact ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MissingRequiredField(_) => "MissingRequiredField",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::InvalidFileType(_) => "InvalidFileType",
            AppError::FileTooLarge { .. } => "FileTooLarge",
            AppError::ExtractionFailed(_) => "ExtractionFailed",
            AppError::InsufficientQuota(_) => "InsufficientQuota",
            AppError::GenerationFailed { .. } => "GenerationFailed",
            AppError::PreconditionFailed { .. } => "PreconditionFailed",
            AppError::AlreadyInProgress(_) => "AlreadyInProgress",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        // Add source error chain
        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MissingRequiredField(ref field) => {
                format!("Missing required field: {}", field)
            }
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::InvalidFileType(ref msg) => msg.clone(),
            AppError::FileTooLarge {
                size_bytes,
                max_bytes,
            } => {
                format!(
                    "File too large: {} bytes exceeds limit of {} bytes",
                    size_bytes, max_bytes
                )
            }
            AppError::ExtractionFailed(_) => {
                "Could not extract text from the uploaded file".to_string()
            }
            AppError::InsufficientQuota(ref msg) => msg.clone(),
            AppError::GenerationFailed { step, .. } => {
                format!("Content generation failed at step {}", step)
            }
            AppError::PreconditionFailed {
                operation,
                required,
                actual,
            } => {
                format!(
                    "Cannot {}: requires status {}, artifact is {}",
                    operation, required, actual
                )
            }
            AppError::AlreadyInProgress(id) => {
                format!("Generation already in progress for artifact {}", id)
            }
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
