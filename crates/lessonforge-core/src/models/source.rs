use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Coarse file classification used to route a source to an extraction strategy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MimeCategory {
    Pdf,
    Ppt,
    Image,
    Text,
}

impl Display for MimeCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MimeCategory::Pdf => write!(f, "pdf"),
            MimeCategory::Ppt => write!(f, "ppt"),
            MimeCategory::Image => write!(f, "image"),
            MimeCategory::Text => write!(f, "text"),
        }
    }
}

impl FromStr for MimeCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(MimeCategory::Pdf),
            "ppt" => Ok(MimeCategory::Ppt),
            "image" => Ok(MimeCategory::Image),
            "text" => Ok(MimeCategory::Text),
            _ => Err(anyhow::anyhow!("Invalid mime category: {}", s)),
        }
    }
}

/// Where the text of a source was extracted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Extracted locally, without calling the extraction service.
    Client,
    /// Extracted by the remote extraction service.
    Server,
}

impl Display for ExtractionMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ExtractionMethod::Client => write!(f, "client"),
            ExtractionMethod::Server => write!(f, "server"),
        }
    }
}

impl FromStr for ExtractionMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(ExtractionMethod::Client),
            "server" => Ok(ExtractionMethod::Server),
            _ => Err(anyhow::anyhow!("Invalid extraction method: {}", s)),
        }
    }
}

/// A validated, extracted source document attached to a generation request.
///
/// Values are immutable once built: ingestion is the only producer, so fields
/// are private and exposed through accessors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedSource {
    file_name: String,
    size_bytes: u64,
    mime_category: MimeCategory,
    extracted_text: String,
    extraction_method: ExtractionMethod,
}

impl UploadedSource {
    pub fn new(
        file_name: impl Into<String>,
        size_bytes: u64,
        mime_category: MimeCategory,
        extracted_text: impl Into<String>,
        extraction_method: ExtractionMethod,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            size_bytes,
            mime_category,
            extracted_text: extracted_text.into(),
            extraction_method,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn mime_category(&self) -> MimeCategory {
        self.mime_category
    }

    pub fn extracted_text(&self) -> &str {
        &self.extracted_text
    }

    pub fn extraction_method(&self) -> ExtractionMethod {
        self.extraction_method
    }
}
