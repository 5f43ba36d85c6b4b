//! Request builders for integration tests.

use uuid::Uuid;

use lessonforge_core::models::{GenerationKind, GenerationRequest};

/// Full lesson with every optional step enabled. Plans as
/// lesson, quiz, flashcards, infographic.
pub fn full_lesson_request(topic: &str) -> GenerationRequest {
    let mut request = GenerationRequest::new(GenerationKind::FullLesson, topic);
    request.subject = Some("Science".to_string());
    request.grade_level = Some("5th grade".to_string());
    request.include_quiz = true;
    request.include_flashcards = true;
    request.include_infographic = true;
    request
}

/// Minimal lesson guide: primary step only.
pub fn lesson_guide_request(topic: &str) -> GenerationRequest {
    GenerationRequest::new(GenerationKind::LessonGuide, topic)
}

/// Audio script summarizing the given artifacts. Plans as script, audio.
pub fn audio_script_request(topic: &str, source_ids: Vec<Uuid>) -> GenerationRequest {
    let mut request = GenerationRequest::new(GenerationKind::AudioScript, topic);
    request.source_ids = source_ids;
    request
}
