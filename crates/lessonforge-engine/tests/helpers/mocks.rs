//! Scripted backends: generator, quota gateway, and remote extractor.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Semaphore;
use uuid::Uuid;

use lessonforge_core::hooks::{QuotaGateway, UsageRecord};
use lessonforge_core::models::{MimeCategory, StepName};
use lessonforge_generation::{ContentGenerator, GenerationUsage, StepContext, StepOutput};
use lessonforge_ingest::RemoteExtractor;

/// Generator with scripted per-step outcomes. Unscripted steps succeed with
/// deterministic content so tests only script what they assert on.
#[derive(Debug)]
pub struct MockGenerator {
    outcomes: Mutex<HashMap<StepName, Result<String, String>>>,
    calls: Mutex<Vec<StepContext>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Generator that blocks every call until `gate` hands out a permit.
    /// Lets a test hold a run mid-step.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gate: Some(gate),
        }
    }

    pub fn with_output(self, step: StepName, content: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(step, Ok(content.to_string()));
        self
    }

    pub fn with_failure(self, step: StepName, message: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(step, Err(message.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_order(&self) -> Vec<StepName> {
        self.calls.lock().unwrap().iter().map(|c| c.step).collect()
    }

    pub fn contexts(&self) -> Vec<StepContext> {
        self.calls.lock().unwrap().clone()
    }

    fn default_content(step: StepName) -> String {
        match step {
            StepName::Audio => "https://cdn.lessonforge.test/audio/render.mp3".to_string(),
            other => format!("{} content", other),
        }
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, context: StepContext) -> Result<StepOutput> {
        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await?;
            permit.forget();
        }
        let step = context.step;
        self.calls.lock().unwrap().push(context);

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .get(&step)
            .cloned()
            .unwrap_or_else(|| Ok(Self::default_content(step)));
        match outcome {
            Ok(content) => Ok(StepOutput {
                content,
                usage: Some(GenerationUsage {
                    input_tokens: 1000,
                    output_tokens: 500,
                }),
            }),
            Err(message) => Err(anyhow::anyhow!("{}", message)),
        }
    }
}

/// Quota gateway recording every affordability check and usage report.
pub struct RecordingQuota {
    denial: Option<String>,
    checks: Mutex<Vec<(Uuid, u32)>>,
    reports: Mutex<Vec<(Uuid, UsageRecord)>>,
}

impl RecordingQuota {
    pub fn allowing() -> Self {
        Self {
            denial: None,
            checks: Mutex::new(Vec::new()),
            reports: Mutex::new(Vec::new()),
        }
    }

    pub fn denying(reason: &str) -> Self {
        Self {
            denial: Some(reason.to_string()),
            checks: Mutex::new(Vec::new()),
            reports: Mutex::new(Vec::new()),
        }
    }

    pub fn checked_credits(&self) -> Vec<u32> {
        self.checks
            .lock()
            .unwrap()
            .iter()
            .map(|(_, credits)| *credits)
            .collect()
    }

    pub fn reported(&self) -> Vec<UsageRecord> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }
}

#[async_trait]
impl QuotaGateway for RecordingQuota {
    async fn check_affordability(
        &self,
        tenant_id: Uuid,
        estimated_credits: u32,
    ) -> Result<Option<String>, String> {
        self.checks
            .lock()
            .unwrap()
            .push((tenant_id, estimated_credits));
        Ok(self.denial.clone())
    }

    async fn report_usage(&self, tenant_id: Uuid, record: UsageRecord) -> Result<(), String> {
        self.reports.lock().unwrap().push((tenant_id, record));
        Ok(())
    }
}

/// Remote extractor returning fixed text without a network call.
pub struct StubRemoteExtractor {
    text: String,
    calls: Mutex<Vec<String>>,
}

impl StubRemoteExtractor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteExtractor for StubRemoteExtractor {
    async fn extract_text(
        &self,
        file_name: &str,
        _category: MimeCategory,
        _data: &[u8],
    ) -> Result<String> {
        self.calls.lock().unwrap().push(file_name.to_string());
        Ok(self.text.clone())
    }
}
