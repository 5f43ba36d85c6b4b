//! Lessonforge Engine Library
//!
//! This crate runs the generation studio: it validates requests, executes
//! multi-step pipeline runs against a content generator, and manages the
//! artifact lifecycle from draft through publication.

pub mod lifecycle;
pub mod orchestrator;
pub mod plan;
pub mod progress;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod validator;

// Re-export commonly used types
pub use lifecycle::{LifecycleManager, RegenerateScope};
pub use orchestrator::PipelineOrchestrator;
pub use plan::{kind_allows_step, PlannedStep, StepPlan};
pub use progress::{ChannelSink, NullSink, ProgressSink};
pub use service::StudioService;
pub use store::{ArtifactStore, InMemoryArtifactStore, StoreError};
pub use telemetry::init_telemetry;
pub use validator::RequestValidator;
