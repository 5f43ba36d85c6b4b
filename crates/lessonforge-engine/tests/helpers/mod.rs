//! Test helpers: build a studio service over scripted backends.
//!
//! Run from workspace root: `cargo test -p lessonforge-engine` or
//! `cargo test -p lessonforge-engine --test pipeline_test`.

pub mod fixtures;
pub mod mocks;

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use lessonforge_core::config::StudioConfig;
use lessonforge_core::models::ProgressEvent;
use lessonforge_engine::{InMemoryArtifactStore, StudioService};

use mocks::{MockGenerator, RecordingQuota, StubRemoteExtractor};

/// Test studio: the service plus handles on its scripted backends.
pub struct TestStudio {
    pub service: StudioService,
    pub generator: Arc<MockGenerator>,
    pub quota: Arc<RecordingQuota>,
    pub extractor: Arc<StubRemoteExtractor>,
    pub store: Arc<InMemoryArtifactStore>,
}

pub fn test_config() -> StudioConfig {
    StudioConfig {
        environment: "test".to_string(),
        max_source_size_bytes: 10 * 1024 * 1024,
        extraction_base_url: "http://localhost:7700".to_string(),
        extraction_api_key: None,
        extraction_timeout_secs: 5,
        generation_base_url: "http://localhost:7800".to_string(),
        generation_api_key: None,
        generation_model: "test-model".to_string(),
        generation_timeout_secs: 5,
    }
}

/// Studio whose generator succeeds on every step.
pub fn setup() -> TestStudio {
    setup_with(MockGenerator::new(), RecordingQuota::allowing())
}

pub fn setup_with(generator: MockGenerator, quota: RecordingQuota) -> TestStudio {
    let generator = Arc::new(generator);
    let quota = Arc::new(quota);
    let extractor = Arc::new(StubRemoteExtractor::new("stub extracted text"));
    let store = Arc::new(InMemoryArtifactStore::new());
    let service = StudioService::new(
        test_config(),
        store.clone(),
        generator.clone(),
        extractor.clone(),
        quota.clone(),
    );
    TestStudio {
        service,
        generator,
        quota,
        extractor,
        store,
    }
}

/// Drain a run's progress channel until the run closes it.
pub async fn collect_events(
    mut receiver: mpsc::UnboundedReceiver<ProgressEvent>,
) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Some(event) = receiver.recv().await {
        events.push(event);
    }
    events
}

pub fn tenant() -> Uuid {
    Uuid::new_v4()
}
