//! HTTP client for the generation service.
//!
//! The service fronts the model provider. This client assembles the prompt
//! for each step, sends it, and hands back the content plus token usage.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lessonforge_core::models::{GenerationKind, StepName};
use lessonforge_core::StudioConfig;

use crate::generator::{ContentGenerator, GenerationUsage, StepContext, StepOutput};

const DEFAULT_MAX_TOKENS: u32 = 8192;

// Generation service request/response structures
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    step: StepName,
    prompt: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    content: String,
    #[serde(default)]
    usage: Option<UsageBody>,
}

#[derive(Debug, Deserialize)]
struct UsageBody {
    input_tokens: u32,
    output_tokens: u32,
}

/// Client for the generation service.
pub struct HttpContentGenerator {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpContentGenerator {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client for generation service")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    pub fn from_config(config: &StudioConfig) -> Result<Self> {
        Self::new(
            config.generation_base_url.clone(),
            config.generation_api_key.clone(),
            config.generation_model.clone(),
            config.generation_timeout_secs,
        )
    }

    /// Build the prompt for a step from the request fields and carried content.
    fn build_step_prompt(context: &StepContext) -> String {
        let mut parts = vec![step_instruction(context)];

        if let Some(subject) = &context.subject {
            parts.push(format!("Subject: {}", subject));
        }
        if let Some(grade_level) = &context.grade_level {
            parts.push(format!("Grade level: {}", grade_level));
        }
        if let Some(curriculum) = &context.curriculum {
            parts.push(format!("Curriculum: {}", curriculum));
        }
        if let Some(duration) = context.duration_minutes {
            parts.push(format!("Lesson duration: {} minutes", duration));
        }
        if context.include_activities {
            parts.push(
                "Include hands-on practice activities students can complete in class.".to_string(),
            );
        }
        if let Some(notes) = &context.additional_notes {
            parts.push(format!("Additional instructions: {}", notes));
        }
        if let Some(source) = &context.source_text {
            parts.push(format!("Use the following source material:\n\n{}", source));
        }
        if let Some(primary) = &context.primary_content {
            parts.push(format!("Reference content:\n\n{}", primary));
        }

        parts.join("\n\n")
    }
}

/// Opening instruction line for a step.
fn step_instruction(context: &StepContext) -> String {
    match context.step {
        StepName::Lesson => match context.kind {
            GenerationKind::LessonGuide => format!(
                "Create a structured lesson guide on \"{}\" with objectives, key concepts, and a suggested teaching sequence.",
                context.topic
            ),
            GenerationKind::SubPlan => format!(
                "Create a substitute teacher plan on \"{}\". It must be self-contained and usable by someone unfamiliar with the class.",
                context.topic
            ),
            _ => format!(
                "Create a complete, teach-ready lesson on \"{}\" with objectives, explanations, worked examples, and a closing summary.",
                context.topic
            ),
        },
        StepName::Quiz => format!(
            "Write a quiz with an answer key covering \"{}\".",
            context.topic
        ),
        StepName::Flashcards => format!(
            "Create a flashcard deck of term/definition pairs for \"{}\".",
            context.topic
        ),
        StepName::Infographic => format!(
            "Design an infographic outline that visualizes the key ideas of \"{}\".",
            context.topic
        ),
        StepName::Script => format!(
            "Write a narration script that walks a student through \"{}\".",
            context.topic
        ),
        StepName::Audio => {
            "Render the narration script in the reference content as audio and return the file URL."
                .to_string()
        }
    }
}

impl fmt::Debug for HttpContentGenerator {
    // api_key stays out of debug output
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpContentGenerator")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ContentGenerator for HttpContentGenerator {
    fn name(&self) -> &str {
        "generation_service"
    }

    async fn generate(&self, context: StepContext) -> Result<StepOutput> {
        let step = context.step;
        let body = GenerateRequest {
            model: self.model.clone(),
            step,
            prompt: Self::build_step_prompt(&context),
            max_tokens: DEFAULT_MAX_TOKENS,
        };

        let url = format!("{}/v1/generate", self.base_url);
        let mut builder = self
            .http_client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("x-api-key", api_key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send request to generation service")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Generation service request failed: {} - {}",
                status,
                error_text
            ));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse generation service response")?;

        tracing::debug!(
            step = %step,
            content_len = parsed.content.len(),
            "Generation step completed"
        );

        Ok(StepOutput {
            content: parsed.content,
            usage: parsed.usage.map(|u| GenerationUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            }),
        })
    }
}
