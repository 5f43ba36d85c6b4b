use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::artifact::ArtifactContentType;
use super::progress::StepName;
use super::source::{MimeCategory, UploadedSource};

/// The generation flow a request drives.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    LessonGuide,
    FullLesson,
    AudioScript,
    SubPlan,
}

impl GenerationKind {
    /// Content type of the artifact this flow produces.
    pub fn content_type(&self) -> ArtifactContentType {
        match self {
            GenerationKind::LessonGuide | GenerationKind::FullLesson => {
                ArtifactContentType::Lesson
            }
            GenerationKind::AudioScript => ArtifactContentType::AudioUpdate,
            GenerationKind::SubPlan => ArtifactContentType::SubPlan,
        }
    }

    /// The mandatory first step of this flow. Its failure fails the run.
    pub fn primary_step(&self) -> StepName {
        match self {
            GenerationKind::AudioScript => StepName::Script,
            GenerationKind::LessonGuide
            | GenerationKind::FullLesson
            | GenerationKind::SubPlan => StepName::Lesson,
        }
    }

    /// Flows that summarize existing classroom material instead of creating
    /// content from a topic alone. They must be given something to summarize.
    pub fn aggregates_existing_content(&self) -> bool {
        matches!(self, GenerationKind::AudioScript | GenerationKind::SubPlan)
    }

    /// Whether the lesson-flow toggles (quiz, flashcards, infographic) apply.
    pub fn supports_optional_steps(&self) -> bool {
        !matches!(self, GenerationKind::AudioScript)
    }

    /// Source file categories this flow accepts for ingestion.
    pub fn allowed_source_categories(&self) -> &'static [MimeCategory] {
        match self {
            GenerationKind::LessonGuide | GenerationKind::FullLesson => &[
                MimeCategory::Pdf,
                MimeCategory::Ppt,
                MimeCategory::Image,
                MimeCategory::Text,
            ],
            GenerationKind::SubPlan => {
                &[MimeCategory::Pdf, MimeCategory::Ppt, MimeCategory::Text]
            }
            GenerationKind::AudioScript => &[MimeCategory::Pdf, MimeCategory::Ppt],
        }
    }
}

impl Display for GenerationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            GenerationKind::LessonGuide => write!(f, "lesson_guide"),
            GenerationKind::FullLesson => write!(f, "full_lesson"),
            GenerationKind::AudioScript => write!(f, "audio_script"),
            GenerationKind::SubPlan => write!(f, "sub_plan"),
        }
    }
}

impl FromStr for GenerationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lesson_guide" => Ok(GenerationKind::LessonGuide),
            "full_lesson" => Ok(GenerationKind::FullLesson),
            "audio_script" => Ok(GenerationKind::AudioScript),
            "sub_plan" => Ok(GenerationKind::SubPlan),
            _ => Err(anyhow::anyhow!("Invalid generation kind: {}", s)),
        }
    }
}

/// Immutable description of what a teacher asked the pipeline to produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct GenerationRequest {
    pub kind: GenerationKind,
    #[validate(length(max = 300))]
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curriculum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 5, max = 240))]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub include_quiz: bool,
    #[serde(default)]
    pub include_flashcards: bool,
    #[serde(default)]
    pub include_infographic: bool,
    /// Asks the primary step to weave practice activities into its output.
    /// Activities are part of the lesson body, not a separate pipeline step.
    #[serde(default)]
    pub include_activities: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 4000))]
    pub additional_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<UploadedSource>,
    /// Existing artifacts an aggregating flow should summarize.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_ids: Vec<Uuid>,
}

impl GenerationRequest {
    pub fn new(kind: GenerationKind, topic: impl Into<String>) -> Self {
        Self {
            kind,
            topic: topic.into(),
            subject: None,
            grade_level: None,
            curriculum: None,
            duration_minutes: None,
            include_quiz: false,
            include_flashcards: false,
            include_infographic: false,
            include_activities: false,
            additional_notes: None,
            source: None,
            source_ids: Vec::new(),
        }
    }

    /// True when the request carries anything to summarize or build on.
    pub fn has_source_material(&self) -> bool {
        self.source.is_some() || !self.source_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_kind_display() {
        assert_eq!(GenerationKind::LessonGuide.to_string(), "lesson_guide");
        assert_eq!(GenerationKind::FullLesson.to_string(), "full_lesson");
        assert_eq!(GenerationKind::AudioScript.to_string(), "audio_script");
        assert_eq!(GenerationKind::SubPlan.to_string(), "sub_plan");
    }

    #[test]
    fn test_generation_kind_from_str() {
        assert_eq!(
            "lesson_guide".parse::<GenerationKind>().unwrap(),
            GenerationKind::LessonGuide
        );
        assert_eq!(
            "audio_script".parse::<GenerationKind>().unwrap(),
            GenerationKind::AudioScript
        );
        assert!("worksheet".parse::<GenerationKind>().is_err());
    }

    #[test]
    fn test_generation_kind_content_type() {
        assert_eq!(
            GenerationKind::LessonGuide.content_type(),
            ArtifactContentType::Lesson
        );
        assert_eq!(
            GenerationKind::FullLesson.content_type(),
            ArtifactContentType::Lesson
        );
        assert_eq!(
            GenerationKind::AudioScript.content_type(),
            ArtifactContentType::AudioUpdate
        );
        assert_eq!(
            GenerationKind::SubPlan.content_type(),
            ArtifactContentType::SubPlan
        );
    }

    #[test]
    fn test_generation_kind_primary_step() {
        assert_eq!(GenerationKind::LessonGuide.primary_step(), StepName::Lesson);
        assert_eq!(GenerationKind::SubPlan.primary_step(), StepName::Lesson);
        assert_eq!(GenerationKind::AudioScript.primary_step(), StepName::Script);
    }

    #[test]
    fn test_generation_kind_aggregates_existing_content() {
        assert!(!GenerationKind::LessonGuide.aggregates_existing_content());
        assert!(!GenerationKind::FullLesson.aggregates_existing_content());
        assert!(GenerationKind::AudioScript.aggregates_existing_content());
        assert!(GenerationKind::SubPlan.aggregates_existing_content());
    }

    #[test]
    fn test_generation_kind_allowed_source_categories() {
        assert_eq!(
            GenerationKind::FullLesson.allowed_source_categories(),
            &[
                MimeCategory::Pdf,
                MimeCategory::Ppt,
                MimeCategory::Image,
                MimeCategory::Text
            ]
        );
        assert!(!GenerationKind::AudioScript
            .allowed_source_categories()
            .contains(&MimeCategory::Image));
        assert!(!GenerationKind::SubPlan
            .allowed_source_categories()
            .contains(&MimeCategory::Image));
        assert!(GenerationKind::SubPlan
            .allowed_source_categories()
            .contains(&MimeCategory::Text));
    }

    #[test]
    fn test_request_new_defaults() {
        let request = GenerationRequest::new(GenerationKind::LessonGuide, "Water cycle");
        assert_eq!(request.topic, "Water cycle");
        assert!(!request.include_quiz);
        assert!(!request.include_flashcards);
        assert!(!request.include_infographic);
        assert!(!request.include_activities);
        assert!(request.source.is_none());
        assert!(request.source_ids.is_empty());
        assert!(!request.has_source_material());
    }

    #[test]
    fn test_request_has_source_material() {
        let mut request = GenerationRequest::new(GenerationKind::SubPlan, "Tomorrow's classes");
        assert!(!request.has_source_material());
        request.source_ids.push(Uuid::new_v4());
        assert!(request.has_source_material());
    }

    #[test]
    fn test_request_deserializes_with_defaulted_toggles() {
        let json = r#"{"kind":"full_lesson","topic":"Fractions"}"#;
        let request: GenerationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.kind, GenerationKind::FullLesson);
        assert!(!request.include_quiz);
        assert!(!request.include_activities);
        assert!(request.duration_minutes.is_none());
    }

    #[test]
    fn test_request_field_bounds() {
        let mut request = GenerationRequest::new(GenerationKind::LessonGuide, "Topic");
        assert!(request.validate().is_ok());

        request.topic = "x".repeat(301);
        assert!(request.validate().is_err());

        request.topic = "Topic".to_string();
        request.duration_minutes = Some(3);
        assert!(request.validate().is_err());
        request.duration_minutes = Some(45);
        assert!(request.validate().is_ok());

        request.additional_notes = Some("n".repeat(4001));
        assert!(request.validate().is_err());
    }
}
