//! Lessonforge Core Library
//!
//! This crate provides core domain models, error types, configuration, and validation
//! that are shared across all Lessonforge components.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod step_error;
pub mod validation;

// Re-export commonly used types
pub use config::StudioConfig;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hooks::{NoOpQuotaGateway, QuotaGateway, StepUsage, UsageRecord};
pub use step_error::{StepError, StepResultExt};
pub use validation::validate_request;
