//! Request validation
//!
//! Shape checks for generation requests: required fields, per-flow source
//! requirements, and field bounds. Quota checks live behind
//! [`crate::hooks::QuotaGateway`] and run after these checks pass.

use validator::Validate;

use crate::error::AppError;
use crate::models::GenerationRequest;

/// Validate a generation request before it reaches the pipeline.
///
/// Flows that summarize existing material (audio updates, sub plans) must
/// carry either an uploaded source or a non-empty selection of existing
/// artifacts.
pub fn validate_request(request: &GenerationRequest) -> Result<(), AppError> {
    if request.topic.trim().is_empty() {
        return Err(AppError::MissingRequiredField("topic".to_string()));
    }

    if request.kind.aggregates_existing_content() && !request.has_source_material() {
        return Err(AppError::MissingRequiredField("source_ids".to_string()));
    }

    request.validate()?;

    Ok(())
}
