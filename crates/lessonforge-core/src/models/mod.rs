//! Data models for the application
//!
//! This module contains all data structures used throughout the application,
//! organized by domain. Each sub-module represents a specific feature area.

mod artifact;
mod progress;
mod request;
mod source;

// Re-export all models for convenient imports
pub use artifact::*;
pub use progress::*;
pub use request::*;
pub use source::*;
