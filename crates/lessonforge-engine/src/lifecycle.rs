//! Artifact lifecycle operations.
//!
//! Status moves go through [`ArtifactStore::transition_status`] so concurrent
//! callers race on a single atomic check. A second regenerate or submit
//! against a running artifact loses that race and reports already-in-progress
//! instead of corrupting the run.

use std::sync::Arc;

use uuid::Uuid;

use lessonforge_core::error::AppError;
use lessonforge_core::models::{ArtifactStatus, ContentArtifact, StepName};

use crate::plan::StepPlan;
use crate::store::{ArtifactStore, StoreError};

/// How much of an artifact a regeneration re-runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerateScope {
    /// The primary step plus the optional steps the original request enabled.
    Full,
    /// Only the primary step; optional outputs are kept as-is.
    Primary,
    /// One specific step.
    Step(StepName),
}

pub struct LifecycleManager {
    store: Arc<dyn ArtifactStore>,
}

impl LifecycleManager {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// Fetch an artifact on behalf of a tenant. Artifacts of other tenants
    /// read as absent.
    pub async fn ensure_owned(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<ContentArtifact, AppError> {
        let artifact = match self.store.get(id).await {
            Ok(artifact) => artifact,
            Err(StoreError::NotFound) => return Err(not_found(id)),
            Err(err) => return Err(err.into()),
        };
        if artifact.tenant_id != tenant_id {
            return Err(not_found(id));
        }
        Ok(artifact)
    }

    /// Move a freshly inserted draft into the generating state. Losing the
    /// race to a run that already claimed the artifact reports
    /// already-in-progress.
    pub async fn begin_generation(&self, id: Uuid) -> Result<ContentArtifact, AppError> {
        match self
            .store
            .transition_status(id, &[ArtifactStatus::Draft], ArtifactStatus::Generating)
            .await
        {
            Ok(artifact) => Ok(artifact),
            Err(StoreError::Conflict {
                actual: ArtifactStatus::Generating,
            }) => Err(AppError::AlreadyInProgress(id)),
            Err(err) => Err(map_transition_error(err, id, "start generation", "draft")),
        }
    }

    /// Claim an artifact for regeneration and wipe the state the new run
    /// will rewrite: the planned steps' outputs, the warning trail, and the
    /// last error. Outputs outside the plan survive, which is what lets a
    /// single-step regeneration keep the rest of the artifact.
    pub async fn prepare_regenerate(
        &self,
        id: Uuid,
        plan: &StepPlan,
    ) -> Result<ContentArtifact, AppError> {
        let allowed = [
            ArtifactStatus::Ready,
            ArtifactStatus::Published,
            ArtifactStatus::Failed,
        ];
        let mut artifact = match self
            .store
            .transition_status(id, &allowed, ArtifactStatus::Generating)
            .await
        {
            Ok(artifact) => artifact,
            Err(StoreError::Conflict {
                actual: ArtifactStatus::Generating,
            }) => return Err(AppError::AlreadyInProgress(id)),
            Err(err) => {
                return Err(map_transition_error(
                    err,
                    id,
                    "regenerate",
                    "ready, published or failed",
                ))
            }
        };

        for planned in plan.steps() {
            artifact.payload.clear_step(planned.name);
        }
        artifact.warnings.clear();
        artifact.last_error = None;
        artifact.touch();
        match self.store.save(artifact.clone()).await {
            Ok(()) => {}
            Err(StoreError::NotFound) => return Err(not_found(id)),
            Err(err) => return Err(err.into()),
        }

        tracing::info!(artifact_id = %id, steps = plan.len(), "Artifact claimed for regeneration");
        Ok(artifact)
    }

    pub async fn publish(&self, id: Uuid) -> Result<ContentArtifact, AppError> {
        let artifact = self
            .store
            .transition_status(id, &[ArtifactStatus::Ready], ArtifactStatus::Published)
            .await
            .map_err(|err| map_transition_error(err, id, "publish", "ready"))?;
        tracing::info!(artifact_id = %id, "Artifact published");
        Ok(artifact)
    }

    pub async fn unpublish(&self, id: Uuid) -> Result<ContentArtifact, AppError> {
        let artifact = self
            .store
            .transition_status(id, &[ArtifactStatus::Published], ArtifactStatus::Ready)
            .await
            .map_err(|err| map_transition_error(err, id, "unpublish", "published"))?;
        tracing::info!(artifact_id = %id, "Artifact unpublished");
        Ok(artifact)
    }

    /// Remove an artifact in any status. A run currently writing to it will
    /// notice the missing row on its next save and abandon.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.store.delete(id).await.map_err(AppError::from)?;
        if !removed {
            return Err(not_found(id));
        }
        tracing::info!(artifact_id = %id, "Artifact deleted");
        Ok(())
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Artifact {} not found", id))
}

fn map_transition_error(err: StoreError, id: Uuid, operation: &str, required: &str) -> AppError {
    match err {
        StoreError::NotFound => not_found(id),
        StoreError::Conflict { actual } => AppError::PreconditionFailed {
            operation: operation.to_string(),
            required: required.to_string(),
            actual: actual.to_string(),
        },
        StoreError::Backend(message) => AppError::Internal(message),
    }
}
