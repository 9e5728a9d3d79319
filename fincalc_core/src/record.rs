//! # Input Records
//!
//! An [`InputRecord`] is the flat `field id -> value` map that crosses the
//! UI/API boundary. Values are plain JSON: numbers, strings, booleans or
//! arrays. A record is created fresh per invocation and converted into a
//! calculator's typed input struct once it has passed schema validation.
//!
//! ## Example
//!
//! ```rust
//! use fincalc_core::record::InputRecord;
//!
//! let record = InputRecord::new()
//!     .with("loanAmount", 300_000.0)
//!     .with("loanType", "conventional")
//!     .with("hasEscrow", true);
//!
//! assert_eq!(record.number("loanAmount"), Some(300_000.0));
//! assert_eq!(record.text("loanType"), Some("conventional"));
//! assert!(record.is_missing("downPayment"));
//! ```

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{CalcError, CalcResult};
use crate::schema::{FieldType, InputField};

/// Flat map of input values keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputRecord {
    values: BTreeMap<String, Value>,
}

impl InputRecord {
    /// Create an empty record
    pub fn new() -> Self {
        InputRecord::default()
    }

    /// Parse a record from a JSON object string
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a record from a JSON value, which must be an object
    pub fn from_value(value: Value) -> CalcResult<Self> {
        match value {
            Value::Object(map) => Ok(InputRecord {
                values: map.into_iter().collect(),
            }),
            other => Err(CalcError::serialization(format!(
                "input record must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Flatten a typed input struct into a record, dropping `null` entries
    pub fn from_typed<T: Serialize>(input: &T) -> CalcResult<Self> {
        let mut record = Self::from_value(serde_json::to_value(input)?)?;
        record.values.retain(|_, v| !v.is_null());
        Ok(record)
    }

    /// Deserialize the record into a typed input struct
    pub fn to_typed<T: DeserializeOwned>(&self) -> CalcResult<T> {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::from_value(Value::Object(map)).map_err(CalcError::from)
    }

    /// Add a value (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Remove a value, returning it if present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Numeric value of a field, if it is a JSON number
    pub fn number(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    /// String value of a field
    pub fn text(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Boolean value of a field
    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    /// A field counts as missing when absent, `null`, or a blank string
    pub fn is_missing(&self, key: &str) -> bool {
        match self.values.get(key) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply schema defaults and coerce form-style values.
    ///
    /// - Missing optional fields take their declared default
    /// - Blank strings and `null` are dropped so they read as missing
    /// - Numeric fields accept strings such as `"$150,000"` or `"6.5%"`
    /// - Boolean fields accept `"true"` / `"false"`
    ///
    /// Values that cannot be coerced are left untouched so the validator
    /// can report them against the field.
    pub fn normalized(&self, fields: &[InputField]) -> InputRecord {
        let mut out = self.clone();
        for field in fields {
            if out.is_missing(&field.id) {
                out.values.remove(&field.id);
                if let Some(default) = &field.default_value {
                    out.values.insert(field.id.clone(), default.clone());
                }
                continue;
            }
            let Some(value) = out.values.get_mut(&field.id) else {
                continue;
            };
            let coerced = match (&*value, field.field_type) {
                (Value::String(raw), ty) if ty.is_numeric() => parse_numeric(raw).map(Value::from),
                (Value::String(raw), FieldType::Boolean) => {
                    match raw.trim().to_ascii_lowercase().as_str() {
                        "true" | "yes" => Some(Value::Bool(true)),
                        "false" | "no" => Some(Value::Bool(false)),
                        _ => None,
                    }
                }
                _ => None,
            };
            if let Some(coerced) = coerced {
                *value = coerced;
            }
        }
        out
    }
}

impl FromIterator<(String, Value)> for InputRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        InputRecord {
            values: iter.into_iter().collect(),
        }
    }
}

/// Parse a form-entered number, tolerating currency symbols, separators and `%`
fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | ' '))
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<InputField> {
        vec![
            InputField::currency("price", "Price").required(),
            InputField::percentage("vacancy", "Vacancy").default_value(5.0),
            InputField::boolean("insured", "Insured"),
        ]
    }

    #[test]
    fn test_from_json_str_requires_object() {
        assert!(InputRecord::from_json_str(r#"{"price": 100}"#).is_ok());
        let err = InputRecord::from_json_str("[1, 2]").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_is_missing_treats_blank_as_missing() {
        let record = InputRecord::new().with("a", "  ").with("b", Value::Null).with("c", 0.0);
        assert!(record.is_missing("a"));
        assert!(record.is_missing("b"));
        assert!(!record.is_missing("c"));
        assert!(record.is_missing("d"));
    }

    #[test]
    fn test_normalized_fills_defaults_and_coerces() {
        let record = InputRecord::new()
            .with("price", "$150,000")
            .with("vacancy", "")
            .with("insured", "yes");
        let normalized = record.normalized(&fields());
        assert_eq!(normalized.number("price"), Some(150_000.0));
        assert_eq!(normalized.number("vacancy"), Some(5.0));
        assert_eq!(normalized.boolean("insured"), Some(true));
    }

    #[test]
    fn test_normalized_leaves_garbage_for_validator() {
        let record = InputRecord::new().with("price", "lots");
        let normalized = record.normalized(&fields());
        assert_eq!(normalized.text("price"), Some("lots"));
    }

    #[test]
    fn test_typed_roundtrip() {
        #[derive(Debug, Serialize, Deserialize, PartialEq)]
        #[serde(rename_all = "camelCase")]
        struct Loan {
            loan_amount: f64,
            #[serde(default)]
            note: Option<String>,
        }

        let loan = Loan {
            loan_amount: 250_000.0,
            note: None,
        };
        let record = InputRecord::from_typed(&loan).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.number("loanAmount"), Some(250_000.0));
        let back: Loan = record.to_typed().unwrap();
        assert_eq!(back, loan);
    }
}
