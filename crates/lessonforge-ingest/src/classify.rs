//! Content-type classification for uploaded source files.

use lessonforge_core::models::MimeCategory;

/// Map a declared Content-Type to a source category.
pub fn classify_content_type(content_type: &str) -> Option<MimeCategory> {
    let normalized = content_type.to_lowercase();
    match normalized.as_str() {
        "application/pdf" => Some(MimeCategory::Pdf),
        "application/vnd.ms-powerpoint"
        | "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
            Some(MimeCategory::Ppt)
        }
        "image/jpeg" | "image/png" | "image/gif" | "image/webp" => Some(MimeCategory::Image),
        "text/plain" | "text/markdown" => Some(MimeCategory::Text),
        _ => None,
    }
}

/// Map a lowercased file extension to the source category it implies.
pub fn category_for_extension(extension: &str) -> Option<MimeCategory> {
    match extension {
        "pdf" => Some(MimeCategory::Pdf),
        "ppt" | "pptx" => Some(MimeCategory::Ppt),
        "jpg" | "jpeg" | "png" | "gif" | "webp" => Some(MimeCategory::Image),
        "txt" | "md" | "markdown" => Some(MimeCategory::Text),
        _ => None,
    }
}

/// Determine the source category from magic bytes.
///
/// Returns `None` when no signature is recognized. Plain text has no reliable
/// signature, so text uploads always fall through to `None`.
pub fn sniff_category(data: &[u8]) -> Option<MimeCategory> {
    if data.len() >= 4 && &data[0..4] == b"%PDF" {
        Some(MimeCategory::Pdf)
    } else if data.starts_with(b"PK\x03\x04") {
        // Office Open XML containers (pptx) are ZIP archives
        Some(MimeCategory::Ppt)
    } else if data.len() >= 2 && data[0..2] == [0xD0, 0xCF] {
        // OLE2 compound file (legacy ppt)
        Some(MimeCategory::Ppt)
    } else if data.len() >= 3 && data[0..3] == [0xFF, 0xD8, 0xFF] {
        Some(MimeCategory::Image)
    } else if data.len() >= 4 && data[0..4] == [0x89, 0x50, 0x4E, 0x47] {
        Some(MimeCategory::Image)
    } else if data.starts_with(b"GIF8") {
        Some(MimeCategory::Image)
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some(MimeCategory::Image)
    } else {
        None
    }
}
