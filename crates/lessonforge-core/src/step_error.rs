//! Pipeline step error types
//!
//! This module provides error types specifically for pipeline step execution,
//! allowing a step to indicate whether its failure is fatal (fails the whole
//! run) or skippable (recorded as a warning while the run continues).

use std::fmt;

/// Step execution error that is either fatal to the run or skippable
#[derive(Debug)]
pub struct StepError {
    inner: anyhow::Error,
    fatal: bool,
}

impl StepError {
    /// Create a new fatal step error
    ///
    /// Fatal errors abort the run: the artifact is marked failed and no
    /// further steps execute. Primary steps always fail this way.
    pub fn fatal(err: impl Into<anyhow::Error>) -> Self {
        Self {
            inner: err.into(),
            fatal: true,
        }
    }

    /// Create a new skippable step error
    ///
    /// Skippable errors are recorded in the run's warning trail and the
    /// pipeline moves on to the next step. Optional steps fail this way.
    pub fn skippable(err: impl Into<anyhow::Error>) -> Self {
        Self {
            inner: err.into(),
            fatal: false,
        }
    }

    /// Check if this error aborts the run
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// Get the inner error
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    /// Consume self and return the inner error
    pub fn into_inner(self) -> anyhow::Error {
        self.inner
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for StepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

impl From<anyhow::Error> for StepError {
    /// Default conversion from anyhow::Error creates a fatal error
    fn from(err: anyhow::Error) -> Self {
        Self::fatal(err)
    }
}

// Note: From<StepError> for anyhow::Error is automatically implemented by anyhow
// via its blanket implementation for any type that implements std::error::Error

/// Extension trait for Result to tag step failures with their severity
pub trait StepResultExt<T> {
    /// Mark this result as fatal to the run on error
    fn fatal_on_err(self) -> Result<T, StepError>;

    /// Mark this result as skippable on error
    fn skippable_on_err(self) -> Result<T, StepError>;
}

impl<T, E: Into<anyhow::Error>> StepResultExt<T> for Result<T, E> {
    fn fatal_on_err(self) -> Result<T, StepError> {
        self.map_err(|e| StepError::fatal(e.into()))
    }

    fn skippable_on_err(self) -> Result<T, StepError> {
        self.map_err(|e| StepError::skippable(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_error() {
        let err = StepError::fatal(anyhow::anyhow!("Generation service rejected request"));
        assert!(err.is_fatal());
        assert!(err.to_string().contains("rejected request"));
    }

    #[test]
    fn test_skippable_error() {
        let err = StepError::skippable(anyhow::anyhow!("Infographic renderer timeout"));
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_from_anyhow() {
        let err: StepError = anyhow::anyhow!("Some error").into();
        assert!(err.is_fatal(), "Default should be fatal");
    }

    #[test]
    fn test_result_ext() {
        let result: Result<(), anyhow::Error> = Err(anyhow::anyhow!("Quiz generation failed"));
        let step_result = result.skippable_on_err();
        assert!(step_result.is_err());
        assert!(!step_result.unwrap_err().is_fatal());
    }
}
