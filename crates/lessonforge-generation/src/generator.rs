//! Content generator abstraction
//!
//! The pipeline orchestrator drives steps through this trait and never talks
//! to a model backend directly.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use lessonforge_core::models::{GenerationKind, StepName};

/// Input assembled for a single generation step.
///
/// Carries the teacher's request fields plus whatever earlier steps produced
/// that this step depends on.
#[derive(Debug, Clone)]
pub struct StepContext {
    pub step: StepName,
    pub kind: GenerationKind,
    pub topic: String,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub curriculum: Option<String>,
    pub duration_minutes: Option<u32>,
    pub additional_notes: Option<String>,
    /// Weave practice activities into the primary step output.
    pub include_activities: bool,
    /// Extracted text from the uploaded source material, if any.
    pub source_text: Option<String>,
    /// Output of the primary step, provided to dependent steps.
    pub primary_content: Option<String>,
}

impl StepContext {
    /// Minimal context for a step, with no request extras or carried content.
    pub fn bare(step: StepName, kind: GenerationKind, topic: impl Into<String>) -> Self {
        Self {
            step,
            kind,
            topic: topic.into(),
            subject: None,
            grade_level: None,
            curriculum: None,
            duration_minutes: None,
            additional_notes: None,
            include_activities: false,
            source_text: None,
            primary_content: None,
        }
    }
}

/// Token usage reported by the model backend for one step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Result of one generation step.
///
/// `content` is the step's text output; for the audio render step it is the
/// URL of the rendered file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutput {
    pub content: String,
    pub usage: Option<GenerationUsage>,
}

/// Trait every model backend must implement.
#[async_trait]
pub trait ContentGenerator: Send + Sync + Debug {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Produce content for a single step.
    async fn generate(&self, context: StepContext) -> Result<StepOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_context_has_no_extras() {
        let context = StepContext::bare(
            StepName::Quiz,
            GenerationKind::FullLesson,
            "Photosynthesis",
        );
        assert_eq!(context.step, StepName::Quiz);
        assert_eq!(context.topic, "Photosynthesis");
        assert!(context.source_text.is_none());
        assert!(context.primary_content.is_none());
        assert!(!context.include_activities);
    }

    #[test]
    fn test_step_output_serde() {
        let output = StepOutput {
            content: "Quiz questions".to_string(),
            usage: Some(GenerationUsage {
                input_tokens: 1200,
                output_tokens: 800,
            }),
        };
        let json = serde_json::to_string(&output).unwrap();
        let back: StepOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.content, "Quiz questions");
        assert_eq!(back.usage.unwrap().output_tokens, 800);
    }
}
