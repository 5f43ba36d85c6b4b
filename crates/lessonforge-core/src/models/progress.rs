use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A generation step that can appear in a pipeline run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    Lesson,
    Quiz,
    Flashcards,
    Infographic,
    Script,
    Audio,
}

impl StepName {
    /// Canonical ordering used when listing which steps a run produced.
    pub const ALL: [StepName; 6] = [
        StepName::Lesson,
        StepName::Quiz,
        StepName::Flashcards,
        StepName::Infographic,
        StepName::Script,
        StepName::Audio,
    ];
}

impl Display for StepName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StepName::Lesson => write!(f, "lesson"),
            StepName::Quiz => write!(f, "quiz"),
            StepName::Flashcards => write!(f, "flashcards"),
            StepName::Infographic => write!(f, "infographic"),
            StepName::Script => write!(f, "script"),
            StepName::Audio => write!(f, "audio"),
        }
    }
}

impl FromStr for StepName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lesson" => Ok(StepName::Lesson),
            "quiz" => Ok(StepName::Quiz),
            "flashcards" => Ok(StepName::Flashcards),
            "infographic" => Ok(StepName::Infographic),
            "script" => Ok(StepName::Script),
            "audio" => Ok(StepName::Audio),
            _ => Err(anyhow::anyhow!("Invalid step name: {}", s)),
        }
    }
}

/// Stage of a pipeline run as reported to progress observers.
///
/// Serialized as a single label (`starting`, `generating_lesson`,
/// `completed`, ...) so clients see one flat vocabulary, while code matches
/// on the step variant instead of parsing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    Starting,
    Generating(StepName),
    Completed,
    Failed,
}

impl Display for ProgressStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProgressStage::Starting => write!(f, "starting"),
            ProgressStage::Generating(step) => write!(f, "generating_{}", step),
            ProgressStage::Completed => write!(f, "completed"),
            ProgressStage::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ProgressStage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starting" => Ok(ProgressStage::Starting),
            "completed" => Ok(ProgressStage::Completed),
            "failed" => Ok(ProgressStage::Failed),
            other => other
                .strip_prefix("generating_")
                .ok_or_else(|| anyhow::anyhow!("Invalid progress stage: {}", s))?
                .parse()
                .map(ProgressStage::Generating),
        }
    }
}

impl Serialize for ProgressStage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProgressStage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single progress update emitted by a pipeline run.
///
/// Within one run `percent` never decreases and `completed_steps` only grows;
/// both reset when a new run starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressEvent {
    #[serde(rename = "step")]
    pub stage: ProgressStage,
    pub message: String,
    pub percent: u8,
    pub completed_steps: Vec<StepName>,
}

impl ProgressEvent {
    pub fn starting() -> Self {
        Self {
            stage: ProgressStage::Starting,
            message: "Starting generation".to_string(),
            percent: 0,
            completed_steps: Vec::new(),
        }
    }

    pub fn generating(step: StepName, percent: u8, completed_steps: Vec<StepName>) -> Self {
        Self {
            stage: ProgressStage::Generating(step),
            message: format!("Generating {}", step),
            percent,
            completed_steps,
        }
    }

    pub fn completed(completed_steps: Vec<StepName>) -> Self {
        Self {
            stage: ProgressStage::Completed,
            message: "Generation completed".to_string(),
            percent: 100,
            completed_steps,
        }
    }

    pub fn failed(
        percent: u8,
        completed_steps: Vec<StepName>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stage: ProgressStage::Failed,
            message: message.into(),
            percent,
            completed_steps,
        }
    }
}
