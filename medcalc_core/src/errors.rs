//! # Error Types
//!
//! Structured error types for medcalc_core. Formula inputs never produce
//! errors (bad entry text is coerced to zero and undefined arithmetic is
//! surfaced as `Infinity`/`NaN` in the result). These variants cover the
//! mistakes made *around* the engine: unknown ids, bad settings files and
//! advisory transport failures.
//!
//! ## Example
//!
//! ```rust
//! use medcalc_core::errors::{CalcError, CalcResult};
//! use medcalc_core::registry::REGISTRY;
//!
//! fn short_name(id: &str) -> CalcResult<&'static str> {
//!     Ok(REGISTRY.get(id)?.short_name)
//! }
//!
//! assert_eq!(short_name("bmi").unwrap(), "BMI");
//! assert_eq!(short_name("nope").unwrap_err().error_code(), "UNKNOWN_CALCULATOR");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for medcalc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for catalog, session and settings operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// No calculator with this id exists in the registry
    #[error("Unknown calculator: {id}")]
    UnknownCalculator { id: String },

    /// The calculator has no field with this id
    #[error("Unknown field '{field}' for calculator '{calculator}'")]
    UnknownField { calculator: String, field: String },

    /// A choice field has no option at this position
    #[error("Choice {index} out of range for field '{field}'")]
    UnknownChoice { field: String, index: usize },

    /// Specialty name did not match any known specialty
    #[error("Unknown specialty: {name}")]
    UnknownSpecialty { name: String },

    /// Theme name did not match any known theme
    #[error("Unknown theme: {name}")]
    UnknownTheme { name: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// The advisory service could not be reached or returned garbage
    #[error("Advisory service error: {reason}")]
    Advisory { reason: String },
}

impl CalcError {
    /// Create an UnknownCalculator error
    pub fn unknown_calculator(id: impl Into<String>) -> Self {
        CalcError::UnknownCalculator { id: id.into() }
    }

    /// Create an UnknownField error
    pub fn unknown_field(calculator: impl Into<String>, field: impl Into<String>) -> Self {
        CalcError::UnknownField {
            calculator: calculator.into(),
            field: field.into(),
        }
    }

    /// Create an UnknownChoice error
    pub fn unknown_choice(field: impl Into<String>, index: usize) -> Self {
        CalcError::UnknownChoice {
            field: field.into(),
            index,
        }
    }

    /// Create an UnknownSpecialty error
    pub fn unknown_specialty(name: impl Into<String>) -> Self {
        CalcError::UnknownSpecialty { name: name.into() }
    }

    /// Create an UnknownTheme error
    pub fn unknown_theme(name: impl Into<String>) -> Self {
        CalcError::UnknownTheme { name: name.into() }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an Advisory error
    pub fn advisory(reason: impl Into<String>) -> Self {
        CalcError::Advisory { reason: reason.into() }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::UnknownCalculator { .. } => "UNKNOWN_CALCULATOR",
            CalcError::UnknownField { .. } => "UNKNOWN_FIELD",
            CalcError::UnknownChoice { .. } => "UNKNOWN_CHOICE",
            CalcError::UnknownSpecialty { .. } => "UNKNOWN_SPECIALTY",
            CalcError::UnknownTheme { .. } => "UNKNOWN_THEME",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Advisory { .. } => "ADVISORY_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
