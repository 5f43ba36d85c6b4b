use std::path::Path;

use lessonforge_core::models::{GenerationKind, MimeCategory};

use crate::classify::{category_for_extension, classify_content_type, sniff_category};
use crate::error::IngestError;

/// Uploaded source file validator
///
/// Runs every check before any extraction work starts, so a rejected upload
/// never reaches the extraction service.
pub struct SourceValidator {
    max_size_bytes: usize,
    allowed_categories: Vec<MimeCategory>,
}

impl SourceValidator {
    pub fn new(max_size_bytes: usize, allowed_categories: Vec<MimeCategory>) -> Self {
        Self {
            max_size_bytes,
            allowed_categories,
        }
    }

    /// Validate file size
    pub fn validate_size(&self, size: usize) -> Result<(), IngestError> {
        if size == 0 {
            return Err(IngestError::EmptyFile);
        }

        if size > self.max_size_bytes {
            return Err(IngestError::FileTooLarge {
                size,
                max: self.max_size_bytes,
            });
        }

        Ok(())
    }

    /// Validate the filename and return its lowercased extension
    pub fn validate_filename(&self, file_name: &str) -> Result<String, IngestError> {
        if file_name.trim().is_empty() || file_name.contains("..") {
            return Err(IngestError::InvalidFilename(file_name.to_string()));
        }

        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| IngestError::InvalidFilename(file_name.to_string()))
    }

    /// Classify the declared Content-Type and check it against the allowed categories
    pub fn classify(&self, content_type: &str) -> Result<MimeCategory, IngestError> {
        let category =
            classify_content_type(content_type).ok_or_else(|| self.unsupported(content_type))?;

        if !self.allowed_categories.contains(&category) {
            return Err(self.unsupported(content_type));
        }

        Ok(category)
    }

    /// Validate that the Content-Type matches the file extension
    /// This prevents Content-Type spoofing where a disallowed file is
    /// uploaded under a legitimate Content-Type.
    pub fn validate_extension_match(
        &self,
        extension: &str,
        content_type: &str,
        category: MimeCategory,
    ) -> Result<(), IngestError> {
        match category_for_extension(extension) {
            Some(expected) if expected != category => Err(IngestError::UnsupportedContentType {
                content_type: format!(
                    "{} (does not match extension '{}')",
                    content_type, extension
                ),
                allowed: self.allowed_names(),
            }),
            Some(_) => Ok(()),
            None => {
                // Unknown extensions skip cross-validation; the Content-Type
                // has already been validated on its own.
                tracing::debug!(
                    extension = %extension,
                    content_type = %content_type,
                    "Unknown extension, skipping Content-Type/extension cross-validation"
                );
                Ok(())
            }
        }
    }

    /// Validate that the file's magic bytes agree with the declared category
    pub fn validate_magic(&self, category: MimeCategory, data: &[u8]) -> Result<(), IngestError> {
        match sniff_category(data) {
            Some(sniffed) if sniffed != category => Err(IngestError::UnsupportedContentType {
                content_type: format!(
                    "file signature indicates {}, declared {}",
                    sniffed, category
                ),
                allowed: self.allowed_names(),
            }),
            _ => Ok(()),
        }
    }

    /// Validate all aspects of an upload and return its category
    pub fn validate_all(
        &self,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<MimeCategory, IngestError> {
        self.validate_size(data.len())?;
        let extension = self.validate_filename(file_name)?;
        let category = self.classify(content_type)?;
        self.validate_extension_match(&extension, content_type, category)?;
        self.validate_magic(category, data)?;
        Ok(category)
    }

    fn unsupported(&self, content_type: &str) -> IngestError {
        IngestError::UnsupportedContentType {
            content_type: content_type.to_string(),
            allowed: self.allowed_names(),
        }
    }

    fn allowed_names(&self) -> Vec<String> {
        self.allowed_categories
            .iter()
            .map(|c| c.to_string())
            .collect()
    }
}

/// Create a validator scoped to the source categories a generation kind accepts.
pub fn validator_for_kind(kind: GenerationKind, max_size_bytes: usize) -> SourceValidator {
    SourceValidator::new(max_size_bytes, kind.allowed_source_categories().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> SourceValidator {
        SourceValidator::new(
            1024 * 1024, // 1MB
            vec![MimeCategory::Pdf, MimeCategory::Text],
        )
    }

    #[test]
    fn test_validate_size_ok() {
        let validator = test_validator();
        assert!(validator.validate_size(512 * 1024).is_ok());
    }

    #[test]
    fn test_validate_size_too_large() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_size(2 * 1024 * 1024),
            Err(IngestError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_size_empty() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_size(0),
            Err(IngestError::EmptyFile)
        ));
    }

    #[test]
    fn test_validate_filename_ok() {
        let validator = test_validator();
        assert_eq!(validator.validate_filename("notes.pdf").unwrap(), "pdf");
        assert_eq!(validator.validate_filename("notes.PDF").unwrap(), "pdf"); // case insensitive
    }

    #[test]
    fn test_validate_filename_rejects_traversal() {
        let validator = test_validator();
        assert!(validator.validate_filename("../etc/passwd.txt").is_err());
    }

    #[test]
    fn test_validate_filename_requires_extension() {
        let validator = test_validator();
        assert!(validator.validate_filename("noextension").is_err());
        assert!(validator.validate_filename("").is_err());
    }

    #[test]
    fn test_classify_ok() {
        let validator = test_validator();
        assert_eq!(
            validator.classify("application/pdf").unwrap(),
            MimeCategory::Pdf
        );
    }

    #[test]
    fn test_classify_unknown_content_type() {
        let validator = test_validator();
        assert!(matches!(
            validator.classify("application/x-msdownload"),
            Err(IngestError::UnsupportedContentType { .. })
        ));
    }

    #[test]
    fn test_classify_disallowed_category() {
        // Images classify fine but are not in this validator's allow list
        let validator = test_validator();
        assert!(validator.classify("image/png").is_err());
    }

    #[test]
    fn test_extension_match_ok() {
        let validator = test_validator();
        assert!(validator
            .validate_extension_match("pdf", "application/pdf", MimeCategory::Pdf)
            .is_ok());
    }

    #[test]
    fn test_extension_match_mismatch() {
        let validator = test_validator();
        assert!(validator
            .validate_extension_match("txt", "application/pdf", MimeCategory::Pdf)
            .is_err());
    }

    #[test]
    fn test_extension_match_unknown_extension_skipped() {
        let validator = test_validator();
        assert!(validator
            .validate_extension_match("xyz", "application/pdf", MimeCategory::Pdf)
            .is_ok());
    }

    #[test]
    fn test_magic_match_ok() {
        let validator = test_validator();
        assert!(validator
            .validate_magic(MimeCategory::Pdf, b"%PDF-1.4\n")
            .is_ok());
    }

    #[test]
    fn test_magic_mismatch_rejected() {
        // PNG bytes uploaded under a PDF Content-Type
        let validator = test_validator();
        assert!(validator
            .validate_magic(MimeCategory::Pdf, &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A])
            .is_err());
    }

    #[test]
    fn test_magic_unrecognized_signature_allowed() {
        let validator = test_validator();
        assert!(validator
            .validate_magic(MimeCategory::Text, b"just some notes")
            .is_ok());
    }

    #[test]
    fn test_validate_all_ok() {
        let validator = test_validator();
        let category = validator
            .validate_all("syllabus.pdf", "application/pdf", b"%PDF-1.4\ncontent")
            .unwrap();
        assert_eq!(category, MimeCategory::Pdf);
    }

    #[test]
    fn test_validate_all_fails_on_size() {
        let validator = SourceValidator::new(4, vec![MimeCategory::Text]);
        assert!(validator
            .validate_all("notes.txt", "text/plain", b"too much content")
            .is_err());
    }

    #[test]
    fn test_validator_for_kind_scopes_categories() {
        // Audio scripts only accept documents, not images or plain text
        let validator = validator_for_kind(GenerationKind::AudioScript, 1024 * 1024);
        assert!(validator.classify("application/pdf").is_ok());
        assert!(validator.classify("image/png").is_err());
        assert!(validator.classify("text/plain").is_err());

        let validator = validator_for_kind(GenerationKind::FullLesson, 1024 * 1024);
        assert!(validator.classify("image/png").is_ok());
        assert!(validator.classify("text/plain").is_ok());
    }
}
