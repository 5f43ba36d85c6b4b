//! Request validation with quota preflight.
//!
//! Shape checks come from [`lessonforge_core::validation`]; this layer adds
//! the plan build and the affordability check against the quota gateway.

use std::sync::Arc;

use uuid::Uuid;

use lessonforge_core::error::AppError;
use lessonforge_core::hooks::QuotaGateway;
use lessonforge_core::models::GenerationRequest;
use lessonforge_core::validation::validate_request;

use crate::plan::StepPlan;

/// Validates generation requests and gates them on tenant quota.
pub struct RequestValidator {
    quota: Arc<dyn QuotaGateway>,
}

impl RequestValidator {
    pub fn new(quota: Arc<dyn QuotaGateway>) -> Self {
        Self { quota }
    }

    /// Run shape checks, build the step plan, and confirm the tenant can
    /// afford it. Returns the plan the orchestrator should execute.
    pub async fn validate(
        &self,
        tenant_id: Uuid,
        request: &GenerationRequest,
    ) -> Result<StepPlan, AppError> {
        validate_request(request)?;

        let plan = StepPlan::for_request(request);
        self.preflight(tenant_id, &plan).await?;

        tracing::debug!(
            tenant_id = %tenant_id,
            kind = %request.kind,
            steps = plan.len(),
            estimated_credits = plan.estimated_credits(),
            "Generation request validated"
        );

        Ok(plan)
    }

    /// Affordability check for an already-built plan. A gateway failure
    /// blocks the run; quota state is unknown, so we do not start work that
    /// may not be covered.
    pub async fn preflight(&self, tenant_id: Uuid, plan: &StepPlan) -> Result<(), AppError> {
        match self
            .quota
            .check_affordability(tenant_id, plan.estimated_credits())
            .await
        {
            Ok(None) => Ok(()),
            Ok(Some(reason)) => Err(AppError::InsufficientQuota(reason)),
            Err(msg) => Err(AppError::Internal(format!("Quota check failed: {}", msg))),
        }
    }
}
