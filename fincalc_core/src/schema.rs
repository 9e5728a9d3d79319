//! # Calculator Schema
//!
//! Declarative descriptions of a calculator's inputs, outputs and worked
//! examples. A [`CalculatorDescriptor`] is built once when a calculator is
//! constructed and never mutated afterwards; the UI renders forms from it and
//! the validator derives required/range/enum checks from it.
//!
//! ## Example
//!
//! ```rust
//! use fincalc_core::schema::{Category, CalculatorDescriptor, InputField, OutputField, OutputKind};
//!
//! let descriptor = CalculatorDescriptor::new("loan", "Loan Payment", Category::Finance, "mortgage")
//!     .with_input(
//!         InputField::currency("loanAmount", "Loan Amount")
//!             .required()
//!             .range(1_000.0, 5_000_000.0)
//!             .step(1_000.0),
//!     )
//!     .with_output(OutputField::new("monthlyPayment", "Monthly Payment", OutputKind::Currency));
//!
//! assert!(descriptor.field("loanAmount").unwrap().required);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::format_number;
use crate::record::InputRecord;

// ============================================================================
// Input Fields
// ============================================================================

/// The kind of value an input field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Amount in base currency units
    Currency,
    /// Whole-number percentage (6.5 = 6.5%)
    Percentage,
    /// Plain number (years, counts, scores)
    Number,
    /// One value from a closed option list
    Select,
    /// True/false flag
    Boolean,
    /// ISO `YYYY-MM-DD` date
    Date,
    /// Free text
    Text,
}

impl FieldType {
    /// Whether values of this type are numbers subject to range checks
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Currency | FieldType::Percentage | FieldType::Number)
    }
}

/// One entry of a select field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// A named, typed input with optional bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    /// Field id, the key used in input records
    pub id: String,

    /// Human-readable label used in forms and messages
    pub label: String,

    /// Value type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the field must be supplied
    pub required: bool,

    /// Inclusive lower bound (numeric types only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Inclusive upper bound (numeric types only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// UI step hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    /// Allowed values (select only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,

    /// Value used when an optional field is left empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Short help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl InputField {
    /// Create an optional field of the given type
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        InputField {
            id: id.into(),
            label: label.into(),
            field_type,
            required: false,
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
            default_value: None,
            help: None,
        }
    }

    /// Currency field
    pub fn currency(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Currency)
    }

    /// Percentage field
    pub fn percentage(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Percentage)
    }

    /// Plain number field
    pub fn number(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Number)
    }

    /// Boolean field
    pub fn boolean(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Boolean)
    }

    /// ISO date field
    pub fn date(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Date)
    }

    /// Free text field
    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldType::Text)
    }

    /// Select field with `(value, label)` options
    pub fn select(id: impl Into<String>, label: impl Into<String>, options: &[(&str, &str)]) -> Self {
        let mut field = Self::new(id, label, FieldType::Select);
        field.options = options
            .iter()
            .map(|(value, label)| SelectOption {
                value: (*value).to_string(),
                label: (*label).to_string(),
            })
            .collect();
        field
    }

    /// Mark the field as required (builder pattern)
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the inclusive lower bound
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the inclusive upper bound
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set both bounds
    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    /// Set the UI step
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Set the default value for an optional field
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Attach help text
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Whether `value` is one of the declared options
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|opt| opt.value == value)
    }

    /// Format a bound for a human-readable message ("$50,000", "20%", "30")
    pub fn format_bound(&self, bound: f64) -> String {
        match self.field_type {
            FieldType::Currency => format!("${}", format_number(bound, 2)),
            FieldType::Percentage => format!("{}%", format_number(bound, 3)),
            _ => format_number(bound, 3),
        }
    }
}

// ============================================================================
// Output Fields
// ============================================================================

/// How an output value should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Currency,
    Percentage,
    Number,
    Months,
    Years,
    /// Narrative or label text
    Text,
    /// List of narrative strings
    List,
    /// Array of row objects (schedules, projections)
    Table,
    /// Break-even style result: converges to a value or never
    Horizon,
}

/// A declared output of a calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputField {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: OutputKind,
}

impl OutputField {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: OutputKind) -> Self {
        OutputField {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }
}

// ============================================================================
// Examples and Descriptors
// ============================================================================

/// A worked example shipped with a calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub title: String,
    pub description: String,
    pub inputs: InputRecord,
}

impl Example {
    pub fn new(title: impl Into<String>, description: impl Into<String>, inputs: InputRecord) -> Self {
        Example {
            title: title.into(),
            description: description.into(),
            inputs,
        }
    }
}

/// Top-level grouping used by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Finance,
    RealEstate,
    Business,
    Insurance,
}

impl Category {
    /// Slug used in JSON and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Finance => "finance",
            Category::RealEstate => "real-estate",
            Category::Business => "business",
            Category::Insurance => "insurance",
        }
    }

    /// Parse a category slug
    pub fn parse(slug: &str) -> Option<Category> {
        match slug {
            "finance" => Some(Category::Finance),
            "real-estate" => Some(Category::RealEstate),
            "business" => Some(Category::Business),
            "insurance" => Some(Category::Insurance),
            _ => None,
        }
    }
}

/// Everything the UI needs to list, render and exercise a calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorDescriptor {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub subcategory: String,
    pub description: String,
    pub inputs: Vec<InputField>,
    pub outputs: Vec<OutputField>,
    pub examples: Vec<Example>,
}

impl CalculatorDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        subcategory: impl Into<String>,
    ) -> Self {
        CalculatorDescriptor {
            id: id.into(),
            name: name.into(),
            category,
            subcategory: subcategory.into(),
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_input(mut self, field: InputField) -> Self {
        self.inputs.push(field);
        self
    }

    pub fn with_output(mut self, field: OutputField) -> Self {
        self.outputs.push(field);
        self
    }

    pub fn with_example(mut self, example: Example) -> Self {
        self.examples.push(example);
        self
    }

    /// Look up an input field by id
    pub fn field(&self, id: &str) -> Option<&InputField> {
        self.inputs.iter().find(|f| f.id == id)
    }

    /// Look up an output field by id
    pub fn output(&self, id: &str) -> Option<&OutputField> {
        self.outputs.iter().find(|f| f.id == id)
    }

    /// Ids of all required input fields
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().filter(|f| f.required).map(|f| f.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builder() {
        let field = InputField::percentage("refinanceLTV", "Refinance LTV")
            .required()
            .range(50.0, 85.0)
            .step(1.0);
        assert!(field.required);
        assert_eq!(field.min, Some(50.0));
        assert_eq!(field.max, Some(85.0));
        assert!(field.field_type.is_numeric());
    }

    #[test]
    fn test_format_bound() {
        let price = InputField::currency("purchasePrice", "Purchase Price");
        assert_eq!(price.format_bound(50_000.0), "$50,000");
        let rate = InputField::percentage("rate", "Rate");
        assert_eq!(rate.format_bound(0.5), "0.5%");
        let years = InputField::number("years", "Years");
        assert_eq!(years.format_bound(30.0), "30");
    }

    #[test]
    fn test_select_options() {
        let field = InputField::select("risk", "Risk", &[("low", "Low"), ("high", "High")]);
        assert!(field.has_option("low"));
        assert!(!field.has_option("medium"));
    }

    #[test]
    fn test_descriptor_serializes_camel_case() {
        let descriptor = CalculatorDescriptor::new("x", "X", Category::RealEstate, "investment")
            .with_input(InputField::currency("purchasePrice", "Purchase Price").default_value(1000.0));
        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(json.contains("\"category\":\"real-estate\""));
        assert!(json.contains("\"defaultValue\":1000.0"));
        assert!(json.contains("\"type\":\"currency\""));
        let roundtrip: CalculatorDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, descriptor);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("real-estate"), Some(Category::RealEstate));
        assert_eq!(Category::parse("crypto"), None);
        assert_eq!(Category::Insurance.as_str(), "insurance");
    }
}
