//! # Input Validation
//!
//! Validation runs in two layers:
//!
//! 1. [`check_schema`] derives generic checks from a calculator's declared
//!    [`InputField`]s: required fields (fail-fast), value types, inclusive
//!    `[min, max]` ranges and select options.
//! 2. Each calculator adds its own cross-field business rules on top, as
//!    blocking errors or advisory warnings.
//!
//! Errors block calculation; warnings never do.
//!
//! ## Example
//!
//! ```rust
//! use fincalc_core::record::InputRecord;
//! use fincalc_core::schema::InputField;
//! use fincalc_core::validation::check_schema;
//!
//! let fields = vec![
//!     InputField::currency("purchasePrice", "Purchase Price").required().min(50_000.0),
//! ];
//!
//! let result = check_schema(&fields, &InputRecord::new().with("purchasePrice", 40_000.0));
//! assert!(!result.is_valid);
//! assert_eq!(result.errors[0].message, "Purchase Price must be at least $50,000");
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CalcError, CalcResult};
use crate::record::InputRecord;
use crate::schema::{FieldType, InputField};

/// ISO date format accepted by date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single validation message tied to the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of validating one input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        ValidationResult::new()
    }
}

impl ValidationResult {
    /// An empty, valid result
    pub fn new() -> Self {
        ValidationResult {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a blocking error
    pub fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(field, message));
        self.is_valid = false;
    }

    /// Record an advisory warning
    pub fn warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::new(field, message));
    }

    /// Whether an error was recorded against `field`
    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|issue| issue.field == field)
    }

    /// Whether a warning was recorded against `field`
    pub fn has_warning_for(&self, field: &str) -> bool {
        self.warnings.iter().any(|issue| issue.field == field)
    }

    /// Error messages in recorded order
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|issue| issue.message.as_str()).collect()
    }

    /// Warning messages in recorded order
    pub fn warning_messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|issue| issue.message.as_str()).collect()
    }

    /// Convert into a `Result`: warnings on success, `ValidationFailed` otherwise
    pub fn into_result(self) -> CalcResult<Vec<ValidationIssue>> {
        if self.is_valid {
            Ok(self.warnings)
        } else {
            Err(CalcError::validation_failed(self.errors))
        }
    }
}

/// Apply the generic schema checks to a (normalized) record.
///
/// Missing required fields are reported first; if any are missing the
/// result is returned immediately without range or option checks.
pub fn check_schema(fields: &[InputField], record: &InputRecord) -> ValidationResult {
    let mut result = ValidationResult::new();

    for field in fields.iter().filter(|f| f.required) {
        if record.is_missing(&field.id) {
            result.error(&field.id, format!("{} is required", field.label));
        }
    }
    if !result.is_valid {
        return result;
    }

    for field in fields {
        if record.is_missing(&field.id) {
            continue;
        }
        if let Some(value) = record.get(&field.id) {
            check_value(field, value, &mut result);
        }
    }

    result
}

fn check_value(field: &InputField, value: &Value, result: &mut ValidationResult) {
    match field.field_type {
        FieldType::Currency | FieldType::Percentage | FieldType::Number => {
            let Some(number) = value.as_f64() else {
                result.error(&field.id, format!("{} must be a number", field.label));
                return;
            };
            check_range(field, number, result);
        }
        FieldType::Select => match value.as_str() {
            Some(choice) if field.has_option(choice) => {}
            _ => {
                let allowed: Vec<&str> = field.options.iter().map(|o| o.value.as_str()).collect();
                result.error(
                    &field.id,
                    format!("{} must be one of: {}", field.label, allowed.join(", ")),
                );
            }
        },
        FieldType::Boolean => {
            if !value.is_boolean() {
                result.error(&field.id, format!("{} must be true or false", field.label));
            }
        }
        FieldType::Date => {
            let parsed = value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok());
            if parsed.is_none() {
                result.error(
                    &field.id,
                    format!("{} must be a date in YYYY-MM-DD format", field.label),
                );
            }
        }
        FieldType::Text => {
            if !value.is_string() {
                result.error(&field.id, format!("{} must be text", field.label));
            }
        }
    }
}

fn check_range(field: &InputField, number: f64, result: &mut ValidationResult) {
    if let Some(min) = field.min {
        if number < min {
            result.error(
                &field.id,
                format!("{} must be at least {}", field.label, field.format_bound(min)),
            );
            return;
        }
    }
    if let Some(max) = field.max {
        if number > max {
            result.error(
                &field.id,
                format!("{} must be at most {}", field.label, field.format_bound(max)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<InputField> {
        vec![
            InputField::currency("purchasePrice", "Purchase Price")
                .required()
                .range(50_000.0, 10_000_000.0),
            InputField::number("loanTerm", "Loan Term").required().range(1.0, 40.0),
            InputField::select("risk", "Market Volatility", &[("low", "Low"), ("high", "High")]),
            InputField::date("placedInService", "Placed In Service"),
            InputField::boolean("insured", "Insured"),
        ]
    }

    fn valid_record() -> InputRecord {
        InputRecord::new()
            .with("purchasePrice", 150_000.0)
            .with("loanTerm", 30.0)
            .with("risk", "low")
            .with("placedInService", "2024-03-15")
            .with("insured", false)
    }

    #[test]
    fn test_valid_record_passes() {
        let result = check_schema(&fields(), &valid_record());
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_required_fails_fast() {
        let mut record = valid_record();
        record.remove("purchasePrice");
        // Out of range, but must not be reported while a required field is missing
        record.set("loanTerm", 100.0);
        let result = check_schema(&fields(), &record);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "purchasePrice");
        assert_eq!(result.errors[0].message, "Purchase Price is required");
    }

    #[test]
    fn test_range_boundaries_are_inclusive() {
        for term in [1.0, 40.0] {
            let record = valid_record().with("loanTerm", term);
            assert!(check_schema(&fields(), &record).is_valid);
        }
        for term in [0.0, 41.0] {
            let record = valid_record().with("loanTerm", term);
            let result = check_schema(&fields(), &record);
            assert!(result.has_error_for("loanTerm"));
        }
    }

    #[test]
    fn test_range_messages() {
        let record = valid_record().with("purchasePrice", 20_000_000.0);
        let result = check_schema(&fields(), &record);
        assert_eq!(result.error_messages(), vec!["Purchase Price must be at most $10,000,000"]);
    }

    #[test]
    fn test_enum_and_type_checks() {
        let record = valid_record()
            .with("risk", "extreme")
            .with("placedInService", "03/15/2024")
            .with("insured", "maybe")
            .with("loanTerm", "thirty");
        let result = check_schema(&fields(), &record);
        assert!(result.has_error_for("risk"));
        assert!(result.has_error_for("placedInService"));
        assert!(result.has_error_for("insured"));
        assert!(result.has_error_for("loanTerm"));
        assert_eq!(
            result.errors[result.errors.iter().position(|e| e.field == "risk").unwrap()].message,
            "Market Volatility must be one of: low, high"
        );
    }

    #[test]
    fn test_into_result() {
        let mut result = ValidationResult::new();
        result.warning("rehabCost", "Rehab cost is high");
        assert_eq!(result.clone().into_result().unwrap().len(), 1);

        result.error("downPayment", "Down payment exceeds price");
        let err = result.into_result().unwrap_err();
        assert_eq!(err.validation_issues()[0].field, "downPayment");
    }

    #[test]
    fn test_serializes_is_valid_camel_case() {
        let json = serde_json::to_string(&ValidationResult::new()).unwrap();
        assert_eq!(json, r#"{"isValid":true,"errors":[],"warnings":[]}"#);
    }
}
