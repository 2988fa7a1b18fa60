//! Error types for Formica operations.
//!
//! None of these are recovered inside the solver: every error aborts the
//! solve attempt and is surfaced to the caller.

use thiserror::Error;

/// Result type for Formica operations.
pub type Result<T> = std::result::Result<T, FormicaError>;

/// Errors that can occur while building or solving a problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormicaError {
    /// Malformed graph or problem parameters. Raised at construction; the
    /// solve never starts.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A probability distribution was non-finite or did not sum to ~1.0,
    /// or a configuration value is out of range.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A variant without an empty-candidate fallback ran out of candidates.
    #[error("Solution construction error: {0}")]
    SolutionConstruction(String),

    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for FormicaError {
    fn from(e: std::io::Error) -> Self {
        FormicaError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for FormicaError {
    fn from(e: serde_json::Error) -> Self {
        FormicaError::Serialization(e.to_string())
    }
}

// Convenience constructors
impl FormicaError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        FormicaError::InvalidInput(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        FormicaError::Configuration(msg.into())
    }

    pub fn solution_construction(msg: impl Into<String>) -> Self {
        FormicaError::SolutionConstruction(msg.into())
    }

    pub fn out_of_range(field: &str, value: f64, expected: &str) -> Self {
        FormicaError::Configuration(format!(
            "{} out of range: {} (must be {})",
            field, value, expected
        ))
    }

    /// Whether this error came from malformed construction input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, FormicaError::InvalidInput(_))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, FormicaError::Configuration(_))
    }

    pub fn is_solution_construction(&self) -> bool {
        matches!(self, FormicaError::SolutionConstruction(_))
    }
}
