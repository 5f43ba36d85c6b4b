//! Studio service facade.
//!
//! Ties ingestion, validation, the orchestrator, and lifecycle management
//! together behind one tenant-scoped API. Every operation takes the calling
//! tenant's id and never exposes another tenant's artifacts.

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use lessonforge_core::config::StudioConfig;
use lessonforge_core::error::AppError;
use lessonforge_core::hooks::QuotaGateway;
use lessonforge_core::models::{
    ArtifactResponse, ContentArtifact, GenerationKind, GenerationRequest, ProgressEvent,
    UploadedSource,
};
use lessonforge_generation::ContentGenerator;
use lessonforge_ingest::{validator_for_kind, IngestDispatcher, RemoteExtractor, SourceFile};

use crate::lifecycle::{LifecycleManager, RegenerateScope};
use crate::orchestrator::PipelineOrchestrator;
use crate::plan::{kind_allows_step, StepPlan};
use crate::progress::{ChannelSink, ProgressSink};
use crate::store::ArtifactStore;
use crate::validator::RequestValidator;

pub struct StudioService {
    config: StudioConfig,
    store: Arc<dyn ArtifactStore>,
    remote_extractor: Arc<dyn RemoteExtractor>,
    validator: RequestValidator,
    lifecycle: LifecycleManager,
    orchestrator: Arc<PipelineOrchestrator>,
}

impl StudioService {
    pub fn new(
        config: StudioConfig,
        store: Arc<dyn ArtifactStore>,
        generator: Arc<dyn ContentGenerator>,
        remote_extractor: Arc<dyn RemoteExtractor>,
        quota: Arc<dyn QuotaGateway>,
    ) -> Self {
        let validator = RequestValidator::new(quota.clone());
        let lifecycle = LifecycleManager::new(store.clone());
        let orchestrator = Arc::new(PipelineOrchestrator::new(store.clone(), generator, quota));
        Self {
            config,
            store,
            remote_extractor,
            validator,
            lifecycle,
            orchestrator,
        }
    }

    /// Validate and extract an uploaded source file for a generation flow.
    /// The result is what the client attaches to its generation request.
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name))]
    pub async fn ingest_source(
        &self,
        kind: GenerationKind,
        file: SourceFile,
    ) -> Result<UploadedSource, AppError> {
        let validator = validator_for_kind(kind, self.config.max_source_size_bytes);
        let dispatcher = IngestDispatcher::new(validator, self.remote_extractor.clone());
        let source = dispatcher.ingest(file).await?;
        Ok(source)
    }

    /// Validate a request, create its artifact, and start the pipeline run.
    ///
    /// Returns as soon as the artifact is claimed for generation, so a second
    /// submit or regenerate against it reports already-in-progress even
    /// before the first step runs. The receiver yields the run's progress
    /// events and closes when the run finishes.
    #[tracing::instrument(
        skip(self, tenant_id, request),
        fields(tenant_id = %tenant_id, kind = %request.kind)
    )]
    pub async fn submit(
        &self,
        tenant_id: Uuid,
        request: GenerationRequest,
    ) -> Result<(ArtifactResponse, mpsc::UnboundedReceiver<ProgressEvent>), AppError> {
        let plan = self.validator.validate(tenant_id, &request).await?;

        let artifact =
            ContentArtifact::new_draft(tenant_id, request.topic.clone(), request.clone());
        let artifact_id = artifact.id;
        self.store.insert(artifact).await.map_err(AppError::from)?;
        let claimed = self.lifecycle.begin_generation(artifact_id).await?;

        let receiver = self.spawn_run(tenant_id, artifact_id, request, plan);
        tracing::info!(
            artifact_id = %artifact_id,
            tenant_id = %tenant_id,
            "Generation submitted"
        );
        Ok((claimed.into(), receiver))
    }

    /// Re-run all or part of the pipeline for an existing artifact, reusing
    /// its stored request.
    #[tracing::instrument(
        skip(self, tenant_id, id),
        fields(tenant_id = %tenant_id, artifact_id = %id)
    )]
    pub async fn regenerate(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        scope: RegenerateScope,
    ) -> Result<(ArtifactResponse, mpsc::UnboundedReceiver<ProgressEvent>), AppError> {
        let artifact = self.lifecycle.ensure_owned(tenant_id, id).await?;
        let request = artifact.request.clone();

        let plan = match scope {
            RegenerateScope::Full => StepPlan::for_request(&request),
            RegenerateScope::Primary => StepPlan::primary_only(request.kind),
            RegenerateScope::Step(step) => {
                if !kind_allows_step(request.kind, step) {
                    return Err(AppError::InvalidInput(format!(
                        "Step {} does not apply to {} artifacts",
                        step, request.kind
                    )));
                }
                StepPlan::single_step(request.kind, step)
            }
        };
        self.validator.preflight(tenant_id, &plan).await?;

        let prepared = self.lifecycle.prepare_regenerate(id, &plan).await?;
        let receiver = self.spawn_run(tenant_id, id, request, plan);
        tracing::info!(artifact_id = %id, scope = ?scope, "Regeneration submitted");
        Ok((prepared.into(), receiver))
    }

    #[tracing::instrument(skip(self))]
    pub async fn publish(&self, tenant_id: Uuid, id: Uuid) -> Result<ArtifactResponse, AppError> {
        self.lifecycle.ensure_owned(tenant_id, id).await?;
        let artifact = self.lifecycle.publish(id).await?;
        Ok(artifact.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn unpublish(&self, tenant_id: Uuid, id: Uuid) -> Result<ArtifactResponse, AppError> {
        self.lifecycle.ensure_owned(tenant_id, id).await?;
        let artifact = self.lifecycle.unpublish(id).await?;
        Ok(artifact.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<ArtifactResponse, AppError> {
        let artifact = self.lifecycle.ensure_owned(tenant_id, id).await?;
        Ok(artifact.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.lifecycle.ensure_owned(tenant_id, id).await?;
        self.lifecycle.delete(id).await
    }

    /// The tenant's artifacts, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<ArtifactResponse>, AppError> {
        let artifacts = self.store.list().await.map_err(AppError::from)?;
        Ok(artifacts
            .into_iter()
            .filter(|artifact| artifact.tenant_id == tenant_id)
            .map(ArtifactResponse::from)
            .collect())
    }

    fn spawn_run(
        &self,
        tenant_id: Uuid,
        artifact_id: Uuid,
        request: GenerationRequest,
        plan: StepPlan,
    ) -> mpsc::UnboundedReceiver<ProgressEvent> {
        let (sink, receiver) = ChannelSink::new();
        let progress: Arc<dyn ProgressSink> = Arc::new(sink);
        let orchestrator = self.orchestrator.clone();
        tokio::spawn(async move {
            if let Err(err) = orchestrator
                .run(tenant_id, artifact_id, request, plan, progress)
                .await
            {
                tracing::error!(artifact_id = %artifact_id, error = %err, "Generation run aborted");
            }
        });
        receiver
    }
}
