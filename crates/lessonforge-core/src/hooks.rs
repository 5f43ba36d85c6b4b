//! Hooks and traits for SaaS integration
//!
//! This module provides trait interfaces that allow the generation core to
//! work with SaaS management features (billing, quota tracking, etc.) without
//! directly depending on them. The SaaS layer implements these traits.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::StepName;

/// Credits and token counts consumed by one completed step
#[derive(Debug, Clone)]
pub struct StepUsage {
    pub step: StepName,
    pub credits: u32,
    pub input_tokens: i64,
    pub output_tokens: i64,
}

/// Usage produced by one pipeline run, reported once after the run finishes
#[derive(Debug, Clone)]
pub struct UsageRecord {
    pub artifact_id: Uuid,
    pub steps: Vec<StepUsage>,
}

impl UsageRecord {
    pub fn new(artifact_id: Uuid) -> Self {
        Self {
            artifact_id,
            steps: Vec::new(),
        }
    }

    pub fn total_credits(&self) -> u32 {
        self.steps.iter().map(|s| s.credits).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Trait for quota checks and usage reporting against the SaaS layer
///
/// The generation core calls these methods around a pipeline run. The SaaS
/// layer implements this trait to enforce plan limits and meter billing.
#[async_trait]
pub trait QuotaGateway: Send + Sync {
    /// Check whether the tenant can afford an estimated number of credits.
    /// Returns Some(reason) when the run must not start.
    async fn check_affordability(
        &self,
        tenant_id: Uuid,
        estimated_credits: u32,
    ) -> Result<Option<String>, String>;

    /// Report the usage a finished run actually consumed
    async fn report_usage(&self, tenant_id: Uuid, record: UsageRecord) -> Result<(), String>;
}

/// No-op implementation for when SaaS features are disabled
pub struct NoOpQuotaGateway;

#[async_trait]
impl QuotaGateway for NoOpQuotaGateway {
    async fn check_affordability(
        &self,
        _tenant_id: Uuid,
        _estimated_credits: u32,
    ) -> Result<Option<String>, String> {
        Ok(None)
    }

    async fn report_usage(&self, _tenant_id: Uuid, _record: UsageRecord) -> Result<(), String> {
        Ok(())
    }
}
