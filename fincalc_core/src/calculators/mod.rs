//! # Calculators
//!
//! Every calculator follows the same pattern:
//!
//! - `*Input` - Typed input parameters (JSON-serializable, camelCase)
//! - `*Result` - Numeric results (JSON-serializable)
//! - `*Narrative` - Presentation strings derived from the result
//! - `validate(&input) -> ValidationResult` - schema checks plus business rules
//! - `calculate(&input) -> CalcResult<*Result>` - validates, then runs the pure formulas
//! - `narrative(&result, &NumberFormat) -> *Narrative` - templated text
//!
//! A unit struct per module implements [`TypedCalculator`]; wrapping it in
//! [`RecordCalculator`] yields the object-safe [`Calculator`] the registry
//! stores, which accepts flat [`InputRecord`]s from a UI or API.
//!
//! ## Available Calculators
//!
//! - [`mortgage_points`] - Discount point cost, break-even and savings
//! - [`brrrr`] - Buy, Rehab, Rent, Refinance, Repeat investment analysis
//! - [`rate_lock`] - Lock versus float decision for a mortgage rate
//! - [`depreciation`] - Straight-line, declining-balance, SYD and MACRS schedules
//! - [`renters_insurance`] - Premium estimate and risk profile
//! - [`triple_net_lease`] - NNN lease investment returns
//! - [`usda_loan`] - USDA guaranteed loan eligibility and payment
//! - [`financial_harmony`] - Personal financial health score

pub mod brrrr;
pub mod depreciation;
pub mod financial_harmony;
pub mod mortgage_points;
pub mod rate_lock;
pub mod renters_insurance;
pub mod triple_net_lease;
pub mod usda_loan;

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::format::NumberFormat;
use crate::record::InputRecord;
use crate::schema::CalculatorDescriptor;
use crate::validation::{check_schema, ValidationIssue, ValidationResult};

pub use brrrr::{BrrrrCalculator, BrrrrInput, BrrrrResult};
pub use depreciation::{DepreciationCalculator, DepreciationInput, DepreciationResult};
pub use financial_harmony::{FinancialHarmonyCalculator, FinancialHarmonyInput, FinancialHarmonyResult};
pub use mortgage_points::{MortgagePointsCalculator, MortgagePointsInput, MortgagePointsResult};
pub use rate_lock::{RateLockCalculator, RateLockInput, RateLockResult};
pub use renters_insurance::{RentersInsuranceCalculator, RentersInsuranceInput, RentersInsuranceResult};
pub use triple_net_lease::{TripleNetLeaseCalculator, TripleNetLeaseInput, TripleNetLeaseResult};
pub use usda_loan::{UsdaLoanCalculator, UsdaLoanInput, UsdaLoanResult};

/// Object-safe calculator contract consumed by the registry.
pub trait Calculator: Send + Sync {
    /// Static description: id, inputs, outputs, examples
    fn descriptor(&self) -> &CalculatorDescriptor;

    /// Validate a raw input record without calculating
    fn validate(&self, inputs: &InputRecord) -> ValidationResult;

    /// Validate and calculate; blocking errors yield `ValidationFailed`
    fn calculate(&self, inputs: &InputRecord) -> CalcResult<CalculatorOutputs>;
}

/// A calculator with typed input, numeric result and narrative.
pub trait TypedCalculator: 'static {
    type Input: Serialize + DeserializeOwned;
    type Result: Serialize;
    type Narrative: Serialize;

    /// The calculator's descriptor, built once
    fn descriptor() -> &'static CalculatorDescriptor;

    /// Cross-field business rules, run after the schema checks pass
    fn check_rules(input: &Self::Input, result: &mut ValidationResult);

    /// Pure numeric calculation on a validated input
    fn compute(input: &Self::Input) -> Self::Result;

    /// Presentation strings for a computed result
    fn narrate(result: &Self::Result, format: &NumberFormat) -> Self::Narrative;
}

/// Schema checks on the serialized typed input, then business rules.
pub fn validate_typed<C: TypedCalculator>(input: &C::Input) -> ValidationResult {
    let record = match InputRecord::from_typed(input) {
        Ok(record) => record,
        Err(err) => {
            let mut result = ValidationResult::new();
            result.error("input", err.to_string());
            return result;
        }
    };
    let mut result = check_schema(&C::descriptor().inputs, &record);
    if result.is_valid {
        C::check_rules(input, &mut result);
    }
    result
}

/// Validate, then compute. Warnings are discarded here; use
/// [`validate_typed`] to inspect them.
pub fn calculate_typed<C: TypedCalculator>(input: &C::Input) -> CalcResult<C::Result> {
    validate_typed::<C>(input).into_result()?;
    Ok(C::compute(input))
}

/// Flat output record handed back to a UI or API caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorOutputs {
    /// Id of the calculator that produced these outputs
    pub calculator_id: String,

    /// Output id -> value (numbers, narrative strings, tables)
    pub values: Map<String, Value>,

    /// Advisory warnings raised during validation
    pub warnings: Vec<ValidationIssue>,
}

impl CalculatorOutputs {
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    /// Numeric output by id
    pub fn number(&self, id: &str) -> Option<f64> {
        self.values.get(id).and_then(Value::as_f64)
    }

    /// Text output by id
    pub fn text(&self, id: &str) -> Option<&str> {
        self.values.get(id).and_then(Value::as_str)
    }
}

/// Adapts a [`TypedCalculator`] to the record-based [`Calculator`] trait.
pub struct RecordCalculator<C: TypedCalculator> {
    format: NumberFormat,
    _calculator: PhantomData<fn() -> C>,
}

impl<C: TypedCalculator> RecordCalculator<C> {
    pub fn new(format: NumberFormat) -> Self {
        RecordCalculator {
            format,
            _calculator: PhantomData,
        }
    }

    /// Normalize, schema-check (fail-fast) and deserialize a record
    fn parse(&self, inputs: &InputRecord) -> Result<C::Input, ValidationResult> {
        let descriptor = C::descriptor();
        let record = inputs.normalized(&descriptor.inputs);
        let schema = check_schema(&descriptor.inputs, &record);
        if !schema.is_valid {
            return Err(schema);
        }
        record.to_typed::<C::Input>().map_err(|err| {
            let mut result = ValidationResult::new();
            result.error("input", err.to_string());
            result
        })
    }
}

impl<C: TypedCalculator> Calculator for RecordCalculator<C> {
    fn descriptor(&self) -> &CalculatorDescriptor {
        C::descriptor()
    }

    fn validate(&self, inputs: &InputRecord) -> ValidationResult {
        match self.parse(inputs) {
            Ok(input) => validate_typed::<C>(&input),
            Err(result) => result,
        }
    }

    fn calculate(&self, inputs: &InputRecord) -> CalcResult<CalculatorOutputs> {
        let id = &C::descriptor().id;
        let input = self
            .parse(inputs)
            .map_err(|result| CalcError::validation_failed(result.errors))?;

        let warnings = validate_typed::<C>(&input).into_result()?;
        let result = C::compute(&input);
        let narrative = C::narrate(&result, &self.format);

        let mut values = into_object(serde_json::to_value(&result)?)?;
        values.extend(into_object(serde_json::to_value(&narrative)?)?);

        debug!(calculator = %id, outputs = values.len(), warnings = warnings.len(), "calculated");
        Ok(CalculatorOutputs {
            calculator_id: id.clone(),
            values,
            warnings,
        })
    }
}

fn into_object(value: Value) -> CalcResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CalcError::Internal {
            message: format!("calculator output must serialize to an object, got {}", other),
        }),
    }
}
