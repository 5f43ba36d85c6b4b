//! Lessonforge Ingest Library
//!
//! Source material ingestion: upload validation, content-type classification,
//! and text extraction. PDF and plain-text uploads are parsed in-process;
//! presentations and images go to the extraction service, and PDFs fall back
//! to it when local parsing yields no usable text.

pub mod classify;
pub mod dispatcher;
pub mod error;
pub mod extract;
pub mod validator;

pub use classify::{classify_content_type, sniff_category};
pub use dispatcher::{IngestDispatcher, SourceFile};
pub use error::IngestError;
pub use extract::{HttpRemoteExtractor, RemoteExtractor};
pub use validator::{validator_for_kind, SourceValidator};

#[cfg(test)]
pub mod test_helpers;
