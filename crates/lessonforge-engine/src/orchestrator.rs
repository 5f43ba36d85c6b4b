//! Pipeline orchestrator.
//!
//! Executes a step plan against one artifact: primary step first, then the
//! optional steps, persisting after every step so observers always see the
//! latest state. Fatal step failures abort the run and mark the artifact
//! failed; skippable failures are recorded as warnings and the run continues.

use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use lessonforge_core::error::AppError;
use lessonforge_core::hooks::{QuotaGateway, StepUsage, UsageRecord};
use lessonforge_core::models::{
    ArtifactStatus, ContentArtifact, GenerationRequest, ProgressEvent, StepName,
};
use lessonforge_core::StepError;
use lessonforge_generation::{ContentGenerator, StepContext, StepOutput};

use crate::plan::{PlannedStep, StepPlan};
use crate::progress::ProgressSink;
use crate::store::{ArtifactStore, StoreError};

/// Percent reported when a step starts. Steps split the bar evenly, with the
/// final slice reserved for completion, so a run over n steps reports
/// 0, 100/(n+1), ..., 100 and never moves backwards.
fn percent_for(index: usize, total: usize) -> u8 {
    (((index + 1) * 100) / (total + 1)) as u8
}

/// Drives pipeline runs. One instance is shared across all runs; per-run
/// state lives on the artifact and in the run's local variables.
pub struct PipelineOrchestrator {
    store: Arc<dyn ArtifactStore>,
    generator: Arc<dyn ContentGenerator>,
    quota: Arc<dyn QuotaGateway>,
}

impl PipelineOrchestrator {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        generator: Arc<dyn ContentGenerator>,
        quota: Arc<dyn QuotaGateway>,
    ) -> Self {
        Self {
            store,
            generator,
            quota,
        }
    }

    /// Execute `plan` against the artifact. The artifact must already be in
    /// the generating state; the run moves it to ready or failed and reports
    /// consumed usage once at the end.
    ///
    /// Returns `Err` only for storage backend failures. Generation failures
    /// are recorded on the artifact, not surfaced here.
    pub async fn run(
        &self,
        tenant_id: Uuid,
        artifact_id: Uuid,
        request: GenerationRequest,
        plan: StepPlan,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<()> {
        progress.report(ProgressEvent::starting()).await;
        tracing::info!(
            artifact_id = %artifact_id,
            kind = %request.kind,
            steps = plan.len(),
            "Starting generation run"
        );

        let mut artifact = match self.store.get(artifact_id).await {
            Ok(artifact) => artifact,
            Err(StoreError::NotFound) => {
                tracing::info!(artifact_id = %artifact_id, "Artifact deleted before run start, abandoning");
                return Ok(());
            }
            Err(err) => {
                return Err(anyhow::Error::new(err).context("Failed to load artifact for run"))
            }
        };

        let source_text = match self.resolve_source_text(tenant_id, &request).await {
            Ok(text) => text,
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(artifact_id = %artifact_id, error = %message, "Run aborted before first step");
                artifact.status = ArtifactStatus::Failed;
                artifact.last_error = Some(message.clone());
                artifact.touch();
                self.persist(&artifact).await?;
                progress
                    .report(ProgressEvent::failed(0, Vec::new(), message))
                    .await;
                return Ok(());
            }
        };

        let primary_step = request.kind.primary_step();
        let mut primary_content: Option<String> =
            artifact.payload.step_output(primary_step).map(str::to_string);
        let mut completed: Vec<StepName> = Vec::new();
        let mut usage = UsageRecord::new(artifact_id);

        for (index, planned) in plan.steps().iter().enumerate() {
            let percent = percent_for(index, plan.len());
            progress
                .report(ProgressEvent::generating(
                    planned.name,
                    percent,
                    completed.clone(),
                ))
                .await;

            let context = build_context(
                planned,
                &request,
                &source_text,
                &primary_content,
                primary_step,
            );

            match self.run_step(planned, context).await {
                Ok(output) => {
                    if planned.name == primary_step {
                        primary_content = Some(output.content.clone());
                    }
                    let (input_tokens, output_tokens) = output
                        .usage
                        .map(|u| (i64::from(u.input_tokens), i64::from(u.output_tokens)))
                        .unwrap_or((0, 0));
                    artifact.payload.set_step_output(planned.name, output.content);
                    artifact.touch();
                    if !self.persist(&artifact).await? {
                        self.report_usage(tenant_id, usage).await;
                        return Ok(());
                    }
                    completed.push(planned.name);
                    usage.steps.push(StepUsage {
                        step: planned.name,
                        credits: planned.credits,
                        input_tokens,
                        output_tokens,
                    });
                }
                Err(step_err) if planned.fatal || step_err.is_fatal() => {
                    let message = AppError::GenerationFailed {
                        step: planned.name,
                        message: step_err.to_string(),
                    }
                    .to_string();
                    tracing::error!(
                        artifact_id = %artifact_id,
                        step = %planned.name,
                        error = %step_err,
                        "Fatal step failure, aborting run"
                    );
                    for scoped in plan.steps() {
                        artifact.payload.clear_step(scoped.name);
                    }
                    artifact.status = ArtifactStatus::Failed;
                    artifact.last_error = Some(message.clone());
                    artifact.touch();
                    if self.persist(&artifact).await? {
                        progress
                            .report(ProgressEvent::failed(percent, completed.clone(), message))
                            .await;
                    }
                    self.report_usage(tenant_id, usage).await;
                    return Ok(());
                }
                Err(step_err) => {
                    let warning = format!("{} generation failed: {}", planned.name, step_err);
                    tracing::warn!(
                        artifact_id = %artifact_id,
                        step = %planned.name,
                        error = %step_err,
                        "Skippable step failure, continuing run"
                    );
                    artifact.warnings.push(warning);
                    artifact.touch();
                    if !self.persist(&artifact).await? {
                        self.report_usage(tenant_id, usage).await;
                        return Ok(());
                    }
                }
            }
        }

        artifact.status = ArtifactStatus::Ready;
        artifact.last_error = None;
        artifact.touch();
        if self.persist(&artifact).await? {
            progress
                .report(ProgressEvent::completed(completed.clone()))
                .await;
            tracing::info!(
                artifact_id = %artifact_id,
                steps = completed.len(),
                warnings = artifact.warnings.len(),
                "Generation run completed"
            );
        }
        self.report_usage(tenant_id, usage).await;
        Ok(())
    }

    async fn run_step(
        &self,
        planned: &PlannedStep,
        context: StepContext,
    ) -> Result<StepOutput, StepError> {
        tracing::info!(
            step = %planned.name,
            generator = self.generator.name(),
            "Running generation step"
        );
        match self.generator.generate(context).await {
            Ok(output) => Ok(output),
            Err(err) => match err.downcast::<StepError>() {
                Ok(step_err) => Err(step_err),
                Err(err) if planned.fatal => Err(StepError::fatal(err)),
                Err(err) => Err(StepError::skippable(err)),
            },
        }
    }

    /// Text the primary step should build on: the uploaded source when the
    /// request carries one, otherwise the selected artifacts stitched into
    /// one titled document. A selected artifact that is missing, owned by
    /// another tenant, or empty fails the run before any step executes.
    async fn resolve_source_text(
        &self,
        tenant_id: Uuid,
        request: &GenerationRequest,
    ) -> Result<Option<String>> {
        if let Some(source) = &request.source {
            return Ok(Some(source.extracted_text().to_string()));
        }
        if request.source_ids.is_empty() {
            return Ok(None);
        }

        let mut sections = Vec::with_capacity(request.source_ids.len());
        for source_id in &request.source_ids {
            let source = match self.store.get(*source_id).await {
                Ok(artifact) if artifact.tenant_id == tenant_id => artifact,
                Ok(_) | Err(StoreError::NotFound) => {
                    anyhow::bail!("Source artifact {} not found", source_id)
                }
                Err(err) => {
                    return Err(anyhow::Error::new(err).context("Failed to load source artifact"))
                }
            };
            let content = source
                .payload
                .step_output(StepName::Lesson)
                .or_else(|| source.payload.step_output(StepName::Script))
                .ok_or_else(|| {
                    anyhow::anyhow!("Source artifact {} has no content to summarize", source_id)
                })?;
            sections.push(format!("## {}\n\n{}", source.title, content));
        }
        Ok(Some(sections.join("\n\n")))
    }

    /// Save the artifact, treating a missing row as a delete racing the run.
    /// Returns whether the artifact still exists.
    async fn persist(&self, artifact: &ContentArtifact) -> Result<bool> {
        match self.store.save(artifact.clone()).await {
            Ok(()) => Ok(true),
            Err(StoreError::NotFound) => {
                tracing::info!(artifact_id = %artifact.id, "Artifact deleted during run, abandoning");
                Ok(false)
            }
            Err(err) => Err(anyhow::Error::new(err).context("Failed to persist artifact")),
        }
    }

    async fn report_usage(&self, tenant_id: Uuid, record: UsageRecord) {
        if record.is_empty() {
            return;
        }
        tracing::debug!(
            artifact_id = %record.artifact_id,
            credits = record.total_credits(),
            "Reporting generation usage"
        );
        if let Err(msg) = self.quota.report_usage(tenant_id, record).await {
            tracing::warn!(error = %msg, "Failed to report generation usage");
        }
    }
}

fn build_context(
    planned: &PlannedStep,
    request: &GenerationRequest,
    source_text: &Option<String>,
    primary_content: &Option<String>,
    primary_step: StepName,
) -> StepContext {
    let is_primary = planned.name == primary_step;
    StepContext {
        step: planned.name,
        kind: request.kind,
        topic: request.topic.clone(),
        subject: request.subject.clone(),
        grade_level: request.grade_level.clone(),
        curriculum: request.curriculum.clone(),
        duration_minutes: request.duration_minutes,
        additional_notes: request.additional_notes.clone(),
        include_activities: request.include_activities && is_primary,
        source_text: if is_primary { source_text.clone() } else { None },
        primary_content: primary_content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryArtifactStore;
    use async_trait::async_trait;
    use lessonforge_core::hooks::NoOpQuotaGateway;
    use lessonforge_core::models::{
        ExtractionMethod, GenerationKind, MimeCategory, UploadedSource,
    };

    #[derive(Debug)]
    struct UnusedGenerator;

    #[async_trait]
    impl ContentGenerator for UnusedGenerator {
        fn name(&self) -> &str {
            "unused"
        }

        async fn generate(&self, context: StepContext) -> Result<StepOutput> {
            anyhow::bail!("unexpected call for step {}", context.step)
        }
    }

    fn orchestrator(store: Arc<InMemoryArtifactStore>) -> PipelineOrchestrator {
        PipelineOrchestrator::new(store, Arc::new(UnusedGenerator), Arc::new(NoOpQuotaGateway))
    }

    fn ready_artifact(tenant_id: Uuid, title: &str, step: StepName, body: &str) -> ContentArtifact {
        let kind = match step {
            StepName::Script => GenerationKind::AudioScript,
            _ => GenerationKind::FullLesson,
        };
        let mut request = GenerationRequest::new(kind, title);
        if kind.aggregates_existing_content() {
            request.source_ids.push(Uuid::new_v4());
        }
        let mut artifact = ContentArtifact::new_draft(tenant_id, title, request);
        artifact.status = ArtifactStatus::Ready;
        artifact.payload.set_step_output(step, body);
        artifact
    }

    #[test]
    fn test_percent_spacing() {
        assert_eq!(percent_for(0, 1), 50);
        assert_eq!(percent_for(0, 3), 25);
        assert_eq!(percent_for(1, 3), 50);
        assert_eq!(percent_for(2, 3), 75);
    }

    #[test]
    fn test_context_scopes_source_and_activities_to_primary() {
        let mut request = GenerationRequest::new(GenerationKind::FullLesson, "Water cycle");
        request.include_activities = true;
        let source_text = Some("extracted notes".to_string());
        let primary_content = Some("lesson body".to_string());

        let primary = PlannedStep {
            name: StepName::Lesson,
            fatal: true,
            credits: 10,
        };
        let context = build_context(
            &primary,
            &request,
            &source_text,
            &None,
            StepName::Lesson,
        );
        assert!(context.include_activities);
        assert_eq!(context.source_text.as_deref(), Some("extracted notes"));

        let quiz = PlannedStep {
            name: StepName::Quiz,
            fatal: false,
            credits: 5,
        };
        let context = build_context(
            &quiz,
            &request,
            &source_text,
            &primary_content,
            StepName::Lesson,
        );
        assert!(!context.include_activities);
        assert!(context.source_text.is_none());
        assert_eq!(context.primary_content.as_deref(), Some("lesson body"));
    }

    #[tokio::test]
    async fn test_resolve_source_text_prefers_upload() {
        let store = Arc::new(InMemoryArtifactStore::new());
        let orchestrator = orchestrator(store);
        let tenant_id = Uuid::new_v4();

        let mut request = GenerationRequest::new(GenerationKind::SubPlan, "Friday plan");
        request.source = Some(UploadedSource::new(
            "plans.pdf",
            2048,
            MimeCategory::Pdf,
            "Period 1: fractions",
            ExtractionMethod::Server,
        ));
        request.source_ids.push(Uuid::new_v4());

        let text = orchestrator
            .resolve_source_text(tenant_id, &request)
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("Period 1: fractions"));
    }

    #[tokio::test]
    async fn test_resolve_source_text_stitches_titled_sections() {
        let store = Arc::new(InMemoryArtifactStore::new());
        let tenant_id = Uuid::new_v4();

        let lesson = ready_artifact(tenant_id, "Fractions", StepName::Lesson, "lesson body");
        let script = ready_artifact(tenant_id, "Weekly recap", StepName::Script, "script text");
        let mut request = GenerationRequest::new(GenerationKind::AudioScript, "This week");
        request.source_ids = vec![lesson.id, script.id];
        store.insert(lesson).await.unwrap();
        store.insert(script).await.unwrap();

        let orchestrator = orchestrator(store);
        let text = orchestrator
            .resolve_source_text(tenant_id, &request)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            text,
            "## Fractions\n\nlesson body\n\n## Weekly recap\n\nscript text"
        );
    }

    #[tokio::test]
    async fn test_resolve_source_text_missing_artifact_fails() {
        let store = Arc::new(InMemoryArtifactStore::new());
        let orchestrator = orchestrator(store);
        let tenant_id = Uuid::new_v4();

        let missing = Uuid::new_v4();
        let mut request = GenerationRequest::new(GenerationKind::AudioScript, "This week");
        request.source_ids.push(missing);

        let err = orchestrator
            .resolve_source_text(tenant_id, &request)
            .await
            .unwrap_err();
        assert!(err.to_string().contains(&missing.to_string()));
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_resolve_source_text_hides_other_tenants() {
        let store = Arc::new(InMemoryArtifactStore::new());
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let lesson = ready_artifact(owner, "Fractions", StepName::Lesson, "lesson body");
        let mut request = GenerationRequest::new(GenerationKind::AudioScript, "This week");
        request.source_ids.push(lesson.id);
        store.insert(lesson).await.unwrap();

        let orchestrator = orchestrator(store);
        let err = orchestrator
            .resolve_source_text(other, &request)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
