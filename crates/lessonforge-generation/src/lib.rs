//! Lessonforge Generation Library
//!
//! Abstraction over the model backend that produces step content, keeping
//! backend implementations separate from pipeline orchestration.

pub mod generator;
pub mod http;

pub use generator::{ContentGenerator, GenerationUsage, StepContext, StepOutput};
pub use http::HttpContentGenerator;
