//! # Error Types
//!
//! Structured error types for fincalc_core. Errors carry enough context for
//! a UI to render a form-level alert or for an API client to react
//! programmatically via [`CalcError::error_code`].
//!
//! ## Example
//!
//! ```rust
//! use fincalc_core::errors::{CalcError, CalcResult};
//!
//! fn check_term(years: f64) -> CalcResult<()> {
//!     if years <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "loanTerm",
//!             years.to_string(),
//!             "Loan term must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_term(30.0).is_ok());
//! assert_eq!(check_term(0.0).unwrap_err().error_code(), "INVALID_INPUT");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::ValidationIssue;

/// Result type alias for fincalc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Validation produced one or more blocking errors
    #[error("Validation failed: {}", join_issues(errors))]
    ValidationFailed { errors: Vec<ValidationIssue> },

    /// No calculator is registered under the requested id
    #[error("Unknown calculator: {id}")]
    UnknownCalculator { id: String },

    /// A calculator with the same id is already registered
    #[error("Calculator already registered: {id}")]
    DuplicateCalculator { id: String },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Settings could not be loaded
    #[error("Configuration error: {source_name} - {reason}")]
    ConfigError { source_name: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ValidationFailed error from blocking issues
    pub fn validation_failed(errors: Vec<ValidationIssue>) -> Self {
        CalcError::ValidationFailed { errors }
    }

    /// Create an UnknownCalculator error
    pub fn unknown_calculator(id: impl Into<String>) -> Self {
        CalcError::UnknownCalculator { id: id.into() }
    }

    /// Create a DuplicateCalculator error
    pub fn duplicate_calculator(id: impl Into<String>) -> Self {
        CalcError::DuplicateCalculator { id: id.into() }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ConfigError {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Blocking validation issues carried by this error, if any
    pub fn validation_issues(&self) -> &[ValidationIssue] {
        match self {
            CalcError::ValidationFailed { errors } => errors,
            _ => &[],
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::ValidationFailed { .. } => "VALIDATION_FAILED",
            CalcError::UnknownCalculator { .. } => "UNKNOWN_CALCULATOR",
            CalcError::DuplicateCalculator { .. } => "DUPLICATE_CALCULATOR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::ConfigError { .. } => "CONFIG_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("loanAmount", "-5", "Loan amount must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
        assert!(json.contains("\"type\":\"InvalidInput\""));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::unknown_calculator("nope").error_code(), "UNKNOWN_CALCULATOR");
        assert_eq!(CalcError::duplicate_calculator("brrrr").error_code(), "DUPLICATE_CALCULATOR");
    }

    #[test]
    fn test_validation_failed_joins_messages() {
        let error = CalcError::validation_failed(vec![
            ValidationIssue::new("purchasePrice", "Purchase Price is required"),
            ValidationIssue::new("rehabCost", "Rehab Cost must be at least $0"),
        ]);
        assert_eq!(
            error.to_string(),
            "Validation failed: Purchase Price is required; Rehab Cost must be at least $0"
        );
        assert_eq!(error.validation_issues().len(), 2);
    }
}
