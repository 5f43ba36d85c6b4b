//! Test helpers for exercising ingestion flows without a live extraction
//! service.

pub mod mock_extractors;

pub use mock_extractors::MockRemoteExtractor;
