use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

use super::progress::StepName;
use super::request::{GenerationKind, GenerationRequest};

/// Lifecycle state of a content artifact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    Draft,
    Generating,
    Ready,
    Published,
    Failed,
}

impl Display for ArtifactStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ArtifactStatus::Draft => write!(f, "draft"),
            ArtifactStatus::Generating => write!(f, "generating"),
            ArtifactStatus::Ready => write!(f, "ready"),
            ArtifactStatus::Published => write!(f, "published"),
            ArtifactStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ArtifactStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ArtifactStatus::Draft),
            "generating" => Ok(ArtifactStatus::Generating),
            "ready" => Ok(ArtifactStatus::Ready),
            "published" => Ok(ArtifactStatus::Published),
            "failed" => Ok(ArtifactStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid artifact status: {}", s)),
        }
    }
}

/// What kind of teaching material an artifact holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactContentType {
    Lesson,
    Quiz,
    FlashcardDeck,
    AudioUpdate,
    SubPlan,
}

impl Display for ArtifactContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ArtifactContentType::Lesson => write!(f, "lesson"),
            ArtifactContentType::Quiz => write!(f, "quiz"),
            ArtifactContentType::FlashcardDeck => write!(f, "flashcard_deck"),
            ArtifactContentType::AudioUpdate => write!(f, "audio_update"),
            ArtifactContentType::SubPlan => write!(f, "sub_plan"),
        }
    }
}

impl FromStr for ArtifactContentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lesson" => Ok(ArtifactContentType::Lesson),
            "quiz" => Ok(ArtifactContentType::Quiz),
            "flashcard_deck" => Ok(ArtifactContentType::FlashcardDeck),
            "audio_update" => Ok(ArtifactContentType::AudioUpdate),
            "sub_plan" => Ok(ArtifactContentType::SubPlan),
            _ => Err(anyhow::anyhow!("Invalid artifact content type: {}", s)),
        }
    }
}

/// Sparse container for generated outputs, one field per pipeline step.
///
/// A field is present exactly when the owning run produced that step, so the
/// set of recorded steps is derived from the payload rather than tracked
/// separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtifactPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flashcards: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infographic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl ArtifactPayload {
    fn field(&self, step: StepName) -> &Option<String> {
        match step {
            StepName::Lesson => &self.lesson,
            StepName::Quiz => &self.quiz,
            StepName::Flashcards => &self.flashcards,
            StepName::Infographic => &self.infographic,
            StepName::Script => &self.script,
            StepName::Audio => &self.audio_url,
        }
    }

    fn field_mut(&mut self, step: StepName) -> &mut Option<String> {
        match step {
            StepName::Lesson => &mut self.lesson,
            StepName::Quiz => &mut self.quiz,
            StepName::Flashcards => &mut self.flashcards,
            StepName::Infographic => &mut self.infographic,
            StepName::Script => &mut self.script,
            StepName::Audio => &mut self.audio_url,
        }
    }

    pub fn step_output(&self, step: StepName) -> Option<&str> {
        self.field(step).as_deref()
    }

    pub fn set_step_output(&mut self, step: StepName, output: impl Into<String>) {
        *self.field_mut(step) = Some(output.into());
    }

    pub fn clear_step(&mut self, step: StepName) {
        *self.field_mut(step) = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Steps with a recorded output, in canonical step order.
    pub fn recorded_steps(&self) -> Vec<StepName> {
        StepName::ALL
            .into_iter()
            .filter(|step| self.field(*step).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        StepName::ALL.iter().all(|step| self.field(*step).is_none())
    }
}

/// A generated piece of teaching content and its lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentArtifact {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub content_type: ArtifactContentType,
    pub status: ArtifactStatus,
    pub payload: ArtifactPayload,
    /// The request that produced this artifact, kept so regeneration can
    /// re-run it without the caller resubmitting.
    pub request: GenerationRequest,
    /// Populated only while the artifact is in the failed state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Non-fatal step failures recorded by the most recent run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentArtifact {
    pub fn new_draft(tenant_id: Uuid, title: impl Into<String>, request: GenerationRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            title: title.into(),
            content_type: request.kind.content_type(),
            status: ArtifactStatus::Draft,
            payload: ArtifactPayload::default(),
            request,
            last_error: None,
            warnings: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Response model for API endpoints
#[derive(Debug, Serialize)]
pub struct ArtifactResponse {
    pub id: Uuid,
    pub title: String,
    pub content_type: ArtifactContentType,
    pub kind: GenerationKind,
    pub status: ArtifactStatus,
    pub payload: ArtifactPayload,
    pub completed_steps: Vec<StepName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContentArtifact> for ArtifactResponse {
    fn from(artifact: ContentArtifact) -> Self {
        let completed_steps = artifact.payload.recorded_steps();
        Self {
            id: artifact.id,
            title: artifact.title,
            content_type: artifact.content_type,
            kind: artifact.request.kind,
            status: artifact.status,
            payload: artifact.payload,
            completed_steps,
            last_error: artifact.last_error,
            warnings: artifact.warnings,
            created_at: artifact.created_at,
            updated_at: artifact.updated_at,
        }
    }
}
