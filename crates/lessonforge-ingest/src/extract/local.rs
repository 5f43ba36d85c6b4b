//! In-process extraction for formats that do not need the extraction service.

use anyhow::{Context, Result};

/// Extract text from PDF bytes with the in-process parser.
///
/// Scanned or image-only PDFs parse successfully but produce little or no
/// text; callers treat an empty result as a reason to fall back to the
/// extraction service.
pub fn extract_pdf_text(data: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(data).context("Failed to parse PDF content")
}

/// Decode a plain-text or markdown upload.
pub fn read_plain_text(data: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(data).context("File is not valid UTF-8")?;
    Ok(text.to_string())
}
