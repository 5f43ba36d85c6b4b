//! Step planning: the ordered steps a pipeline run will execute, with each
//! step's failure policy and credit cost.

use lessonforge_core::models::{GenerationKind, GenerationRequest, StepName};

fn credits_for(step: StepName) -> u32 {
    match step {
        StepName::Lesson | StepName::Script => 10,
        StepName::Quiz | StepName::Flashcards | StepName::Infographic => 5,
        StepName::Audio => 15,
    }
}

/// One pipeline step with its failure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStep {
    pub name: StepName,
    /// Failure of a fatal step fails the whole run; other failures are
    /// recorded as warnings and the run continues.
    pub fatal: bool,
    pub credits: u32,
}

impl PlannedStep {
    fn primary(name: StepName) -> Self {
        Self {
            name,
            fatal: true,
            credits: credits_for(name),
        }
    }

    fn optional(name: StepName) -> Self {
        Self {
            name,
            fatal: false,
            credits: credits_for(name),
        }
    }
}

/// Ordered steps for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    steps: Vec<PlannedStep>,
}

impl StepPlan {
    /// Full plan for a request: the primary step, then the enabled optional
    /// steps in canonical order. Audio scripts always render audio after the
    /// script and ignore the lesson-flow toggles.
    pub fn for_request(request: &GenerationRequest) -> Self {
        let kind = request.kind;
        let mut steps = vec![PlannedStep::primary(kind.primary_step())];

        if kind == GenerationKind::AudioScript {
            steps.push(PlannedStep::optional(StepName::Audio));
            return Self { steps };
        }

        if kind.supports_optional_steps() {
            if request.include_quiz {
                steps.push(PlannedStep::optional(StepName::Quiz));
            }
            if request.include_flashcards {
                steps.push(PlannedStep::optional(StepName::Flashcards));
            }
            if request.include_infographic {
                steps.push(PlannedStep::optional(StepName::Infographic));
            }
        }

        Self { steps }
    }

    /// Plan that re-runs only the primary step.
    pub fn primary_only(kind: GenerationKind) -> Self {
        Self {
            steps: vec![PlannedStep::primary(kind.primary_step())],
        }
    }

    /// Plan for a single step. The step is fatal only when it is the kind's
    /// primary step; regenerating just an optional step that then fails
    /// leaves the artifact usable with a warning.
    pub fn single_step(kind: GenerationKind, step: StepName) -> Self {
        let planned = if step == kind.primary_step() {
            PlannedStep::primary(step)
        } else {
            PlannedStep::optional(step)
        };
        Self {
            steps: vec![planned],
        }
    }

    pub fn steps(&self) -> &[PlannedStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn estimated_credits(&self) -> u32 {
        self.steps.iter().map(|s| s.credits).sum()
    }
}

/// Whether a step can run for a generation kind at all. Used to reject
/// regeneration requests for steps that do not belong to the flow.
pub fn kind_allows_step(kind: GenerationKind, step: StepName) -> bool {
    if step == kind.primary_step() {
        return true;
    }
    match kind {
        GenerationKind::AudioScript => step == StepName::Audio,
        _ => {
            kind.supports_optional_steps()
                && matches!(
                    step,
                    StepName::Quiz | StepName::Flashcards | StepName::Infographic
                )
        }
    }
}
