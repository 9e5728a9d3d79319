//! # Calculator Registry
//!
//! An ordered collection of calculators keyed by id. The registry is built
//! explicitly by the caller (there is no global instance) and is immutable
//! once handed to the consumer, so it can be shared behind an `Arc`.
//!
//! ## Example
//!
//! ```rust
//! use fincalc_core::record::InputRecord;
//! use fincalc_core::registry::CalculatorRegistry;
//! use fincalc_core::settings::Settings;
//!
//! let registry = CalculatorRegistry::builtin(&Settings::default()).unwrap();
//! assert!(registry.get("brrrr").is_some());
//!
//! let inputs = InputRecord::new()
//!     .with("loanAmount", 300_000.0)
//!     .with("baseInterestRate", 6.75)
//!     .with("discountPoints", 2.0);
//!
//! let outputs = registry.calculate("mortgage-points", &inputs).unwrap();
//! assert_eq!(outputs.number("pointsCost"), Some(6_000.0));
//! ```

use tracing::{debug, instrument};

use crate::calculators::{
    BrrrrCalculator, Calculator, CalculatorOutputs, DepreciationCalculator,
    FinancialHarmonyCalculator, MortgagePointsCalculator, RateLockCalculator, RecordCalculator,
    RentersInsuranceCalculator, TripleNetLeaseCalculator, TypedCalculator, UsdaLoanCalculator,
};
use crate::errors::{CalcError, CalcResult};
use crate::format::NumberFormat;
use crate::record::InputRecord;
use crate::schema::{CalculatorDescriptor, Category};
use crate::settings::Settings;
use crate::validation::ValidationResult;

/// Ordered collection of calculators keyed by id.
#[derive(Default)]
pub struct CalculatorRegistry {
    calculators: Vec<Box<dyn Calculator>>,
}

impl CalculatorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        CalculatorRegistry::default()
    }

    /// Register every built-in calculator enabled in `settings`.
    ///
    /// Narrative text uses the number format from `settings.report`.
    pub fn builtin(settings: &Settings) -> CalcResult<Self> {
        let mut registry = CalculatorRegistry::new();
        let format = &settings.report;

        registry.register_enabled::<MortgagePointsCalculator>(settings, format)?;
        registry.register_enabled::<BrrrrCalculator>(settings, format)?;
        registry.register_enabled::<RateLockCalculator>(settings, format)?;
        registry.register_enabled::<DepreciationCalculator>(settings, format)?;
        registry.register_enabled::<RentersInsuranceCalculator>(settings, format)?;
        registry.register_enabled::<TripleNetLeaseCalculator>(settings, format)?;
        registry.register_enabled::<UsdaLoanCalculator>(settings, format)?;
        registry.register_enabled::<FinancialHarmonyCalculator>(settings, format)?;

        debug!(count = registry.len(), "built-in calculators registered");
        Ok(registry)
    }

    fn register_enabled<C: TypedCalculator>(
        &mut self,
        settings: &Settings,
        format: &NumberFormat,
    ) -> CalcResult<()> {
        let id = &C::descriptor().id;
        if settings.registry.is_enabled(id) {
            self.register_typed::<C>(format.clone())
        } else {
            debug!(calculator = %id, "disabled by settings");
            Ok(())
        }
    }

    /// Append a calculator. Ids must be unique.
    pub fn register(&mut self, calculator: Box<dyn Calculator>) -> CalcResult<()> {
        let id = calculator.descriptor().id.clone();
        if self.get(&id).is_some() {
            return Err(CalcError::duplicate_calculator(id));
        }
        debug!(calculator = %id, "registered");
        self.calculators.push(calculator);
        Ok(())
    }

    /// Register a typed calculator through the record adapter
    pub fn register_typed<C: TypedCalculator>(&mut self, format: NumberFormat) -> CalcResult<()> {
        self.register(Box::new(RecordCalculator::<C>::new(format)))
    }

    /// Look up a calculator by id
    pub fn get(&self, id: &str) -> Option<&dyn Calculator> {
        self.calculators
            .iter()
            .find(|c| c.descriptor().id == id)
            .map(|c| c.as_ref())
    }

    fn require(&self, id: &str) -> CalcResult<&dyn Calculator> {
        self.get(id).ok_or_else(|| CalcError::unknown_calculator(id))
    }

    /// Descriptors in registration order
    pub fn list(&self) -> Vec<&CalculatorDescriptor> {
        self.calculators.iter().map(|c| c.descriptor()).collect()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.calculators
            .iter()
            .map(|c| c.descriptor().id.as_str())
            .collect()
    }

    /// Descriptors in one category, in registration order
    pub fn by_category(&self, category: Category) -> Vec<&CalculatorDescriptor> {
        self.calculators
            .iter()
            .map(|c| c.descriptor())
            .filter(|d| d.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    /// Validate a record against the calculator `id`
    #[instrument(skip(self, inputs), fields(fields = inputs.len()))]
    pub fn validate(&self, id: &str, inputs: &InputRecord) -> CalcResult<ValidationResult> {
        let result = self.require(id)?.validate(inputs);
        debug!(
            valid = result.is_valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated"
        );
        Ok(result)
    }

    /// Validate and calculate a record with the calculator `id`
    #[instrument(skip(self, inputs), fields(fields = inputs.len()))]
    pub fn calculate(&self, id: &str, inputs: &InputRecord) -> CalcResult<CalculatorOutputs> {
        self.require(id)?.calculate(inputs)
    }
}

impl std::fmt::Debug for CalculatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculatorRegistry")
            .field("calculators", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::mortgage_points;
    use crate::settings::RegistrySettings;

    #[test]
    fn test_builtin_registers_all_in_order() {
        let registry = CalculatorRegistry::builtin(&Settings::default()).unwrap();
        assert_eq!(
            registry.ids(),
            vec![
                "mortgage-points",
                "brrrr",
                "rate-lock",
                "depreciation",
                "renters-insurance",
                "triple-net-lease",
                "usda-loan",
                "financial-harmony",
            ]
        );
        assert_eq!(registry.len(), 8);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_settings_filter_calculators() {
        let settings = Settings {
            registry: RegistrySettings {
                enabled: vec!["brrrr".to_string(), "usda-loan".to_string()],
            },
            ..Settings::default()
        };
        let registry = CalculatorRegistry::builtin(&settings).unwrap();
        assert_eq!(registry.ids(), vec!["brrrr", "usda-loan"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = CalculatorRegistry::new();
        registry
            .register_typed::<MortgagePointsCalculator>(NumberFormat::default())
            .unwrap();
        let err = registry
            .register_typed::<MortgagePointsCalculator>(NumberFormat::default())
            .unwrap_err();
        assert_eq!(err, CalcError::duplicate_calculator(mortgage_points::ID));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_calculator() {
        let registry = CalculatorRegistry::new();
        assert!(registry.is_empty());
        let err = registry.calculate("nope", &InputRecord::new()).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_CALCULATOR");
        assert!(registry.validate("nope", &InputRecord::new()).is_err());
    }

    #[test]
    fn test_by_category() {
        let registry = CalculatorRegistry::builtin(&Settings::default()).unwrap();
        let real_estate: Vec<&str> = registry
            .by_category(Category::RealEstate)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(real_estate, vec!["brrrr", "triple-net-lease"]);
        assert_eq!(registry.by_category(Category::Insurance).len(), 1);
        assert_eq!(registry.by_category(Category::Finance).len(), 4);
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let registry = CalculatorRegistry::builtin(&Settings::default()).unwrap();
        let result = registry
            .validate("mortgage-points", &InputRecord::new().with("loanAmount", 300_000.0))
            .unwrap();
        assert!(!result.is_valid);
        assert!(result.has_error_for("baseInterestRate"));
        assert!(result.has_error_for("discountPoints"));
    }

    #[test]
    fn test_calculate_merges_result_and_narrative() {
        let registry = CalculatorRegistry::builtin(&Settings::default()).unwrap();
        let inputs = InputRecord::new()
            .with("loanAmount", "$300,000")
            .with("baseInterestRate", "6.75%")
            .with("discountPoints", 2);
        let outputs = registry.calculate("mortgage-points", &inputs).unwrap();
        assert_eq!(outputs.calculator_id, "mortgage-points");
        assert_eq!(outputs.number("pointsCost"), Some(6_000.0));
        assert!(outputs.text("recommendation").is_some());
        assert_eq!(
            outputs.get("breakEvenMonths").and_then(|v| v.get("kind")),
            Some(&serde_json::json!("converges"))
        );
    }
}
