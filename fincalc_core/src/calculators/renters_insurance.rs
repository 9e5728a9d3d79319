//! # Renters Insurance Estimator
//!
//! Rating-factor premium estimate for a renters (HO-4) policy.
//!
//! ```text
//! base    = $6 per $1,000 of personal property + $15 per $100,000 of liability
//! premium = base × location × building × credit × claims × deductible × replacement
//!                × (1 − discounts)
//! ```
//!
//! The factor tables are illustrative market averages, not a filed rate plan.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::finance::{linear_score, step_lookup, WeightedScore};
use crate::format::NumberFormat;
use crate::record::InputRecord;
use crate::schema::{CalculatorDescriptor, Category, Example, InputField, OutputField, OutputKind};
use crate::units::Percent;
use crate::validation::ValidationResult;

use super::{calculate_typed, validate_typed, TypedCalculator};

/// Calculator id
pub const ID: &str = "renters-insurance";

// ============================================================================
// Rating Tables
// ============================================================================

/// Premium per $1,000 of personal property
const PROPERTY_RATE_PER_THOUSAND: f64 = 6.0;
/// Premium per $100,000 of liability coverage
const LIABILITY_RATE_PER_100K: f64 = 15.0;
const MINIMUM_ANNUAL_PREMIUM: f64 = 100.0;

/// `(minimum score, factor)`, highest first
const CREDIT_FACTORS: [(f64, f64); 4] = [(750.0, 0.85), (700.0, 0.95), (650.0, 1.0), (600.0, 1.15)];
const POOR_CREDIT_FACTOR: f64 = 1.3;

const CLAIM_SURCHARGE: f64 = 0.15;
const MAX_CLAIMS_FACTOR: f64 = 1.75;

/// `(minimum deductible, factor)`, highest first
const DEDUCTIBLE_FACTORS: [(f64, f64); 3] = [(2_500.0, 0.75), (1_000.0, 0.85), (500.0, 1.0)];
const LOW_DEDUCTIBLE_FACTOR: f64 = 1.1;

const REPLACEMENT_COST_FACTOR: f64 = 1.1;
const SECURITY_DISCOUNT: f64 = 5.0;
const SMOKE_DETECTOR_DISCOUNT: f64 = 3.0;

/// Loss-of-use coverage as a share of personal property (%)
const LOSS_OF_USE_PERCENT: f64 = 20.0;

/// `(minimum liability, medical payments limit)`, highest first
const MEDICAL_PAYMENTS: [(f64, f64); 2] = [(500_000.0, 5_000.0), (300_000.0, 2_000.0)];
const BASE_MEDICAL_PAYMENTS: f64 = 1_000.0;

const MAX_CLAIMS_WITHOUT_WARNING: f64 = 3.0;

pub fn credit_factor(score: f64) -> f64 {
    step_lookup(score, &CREDIT_FACTORS, POOR_CREDIT_FACTOR)
}

pub fn credit_tier(score: f64) -> &'static str {
    step_lookup(
        score,
        &[(750.0, "excellent"), (700.0, "good"), (650.0, "fair"), (600.0, "below average")],
        "poor",
    )
}

pub fn claims_factor(claims: f64) -> f64 {
    (1.0 + CLAIM_SURCHARGE * claims.max(0.0)).min(MAX_CLAIMS_FACTOR)
}

pub fn deductible_factor(deductible: f64) -> f64 {
    step_lookup(deductible, &DEDUCTIBLE_FACTORS, LOW_DEDUCTIBLE_FACTOR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationRisk {
    Low,
    #[default]
    Moderate,
    High,
}

impl LocationRisk {
    pub fn factor(&self) -> f64 {
        match self {
            LocationRisk::Low => 0.9,
            LocationRisk::Moderate => 1.0,
            LocationRisk::High => 1.3,
        }
    }

    fn risk(&self) -> f64 {
        match self {
            LocationRisk::Low => 20.0,
            LocationRisk::Moderate => 50.0,
            LocationRisk::High => 85.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingType {
    #[default]
    Apartment,
    Condo,
    Townhouse,
    House,
}

impl BuildingType {
    pub fn factor(&self) -> f64 {
        match self {
            BuildingType::Apartment => 1.0,
            BuildingType::Condo => 0.95,
            BuildingType::Townhouse => 1.05,
            BuildingType::House => 1.15,
        }
    }
}

// ============================================================================
// Input / Result
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentersInsuranceInput {
    pub personal_property_value: f64,
    pub liability_coverage: f64,
    pub deductible: f64,
    #[serde(default)]
    pub location_risk: LocationRisk,
    #[serde(default)]
    pub building_type: BuildingType,
    pub credit_score: f64,
    #[serde(default)]
    pub claims_in_last5_years: f64,
    /// Replacement-cost (rather than actual cash value) coverage
    #[serde(default)]
    pub replacement_cost: bool,
    #[serde(default)]
    pub has_security_system: bool,
    #[serde(default)]
    pub has_smoke_detectors: bool,
}

impl Default for RentersInsuranceInput {
    fn default() -> Self {
        RentersInsuranceInput {
            personal_property_value: 30_000.0,
            liability_coverage: 100_000.0,
            deductible: 500.0,
            location_risk: LocationRisk::Moderate,
            building_type: BuildingType::Apartment,
            credit_score: 720.0,
            claims_in_last5_years: 0.0,
            replacement_cost: true,
            has_security_system: false,
            has_smoke_detectors: true,
        }
    }
}

impl RentersInsuranceInput {
    pub fn base_premium(&self) -> f64 {
        self.personal_property_value / 1_000.0 * PROPERTY_RATE_PER_THOUSAND
            + self.liability_coverage / 100_000.0 * LIABILITY_RATE_PER_100K
    }

    /// Total discount (%)
    pub fn discount_percent(&self) -> f64 {
        let mut discount = 0.0;
        if self.has_security_system {
            discount += SECURITY_DISCOUNT;
        }
        if self.has_smoke_detectors {
            discount += SMOKE_DETECTOR_DISCOUNT;
        }
        discount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentersInsuranceResult {
    pub base_premium: f64,
    pub location_factor: f64,
    pub building_factor: f64,
    pub credit_factor: f64,
    pub credit_tier: String,
    pub claims_factor: f64,
    pub deductible_factor: f64,
    pub replacement_cost_factor: f64,
    pub discount_percent: f64,
    pub annual_premium: f64,
    pub monthly_premium: f64,
    pub loss_of_use_coverage: f64,
    pub medical_payments_coverage: f64,
    /// 0-100, higher is riskier
    pub risk_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentersInsuranceNarrative {
    pub risk_level: String,
    pub recommendation: String,
}

pub fn validate(input: &RentersInsuranceInput) -> ValidationResult {
    validate_typed::<RentersInsuranceCalculator>(input)
}

pub fn calculate(input: &RentersInsuranceInput) -> CalcResult<RentersInsuranceResult> {
    calculate_typed::<RentersInsuranceCalculator>(input)
}

pub fn narrative(result: &RentersInsuranceResult, format: &NumberFormat) -> RentersInsuranceNarrative {
    RentersInsuranceCalculator::narrate(result, format)
}

pub struct RentersInsuranceCalculator;

impl TypedCalculator for RentersInsuranceCalculator {
    type Input = RentersInsuranceInput;
    type Result = RentersInsuranceResult;
    type Narrative = RentersInsuranceNarrative;

    fn descriptor() -> &'static CalculatorDescriptor {
        &DESCRIPTOR
    }

    fn check_rules(input: &RentersInsuranceInput, result: &mut ValidationResult) {
        if input.deductible >= input.personal_property_value {
            result.error(
                "deductible",
                "Deductible must be less than the personal property value",
            );
            return;
        }
        if input.deductible > input.personal_property_value * 0.1 {
            result.warning(
                "deductible",
                "Deductible is more than 10% of your personal property value",
            );
        }
        if input.claims_in_last5_years > MAX_CLAIMS_WITHOUT_WARNING {
            result.warning(
                "claimsInLast5Years",
                "More than 3 recent claims may make coverage hard to obtain",
            );
        }
    }

    fn compute(input: &RentersInsuranceInput) -> RentersInsuranceResult {
        let base_premium = input.base_premium();
        let location_factor = input.location_risk.factor();
        let building_factor = input.building_type.factor();
        let credit = credit_factor(input.credit_score);
        let claims = claims_factor(input.claims_in_last5_years);
        let deductible = deductible_factor(input.deductible);
        let replacement_cost_factor = if input.replacement_cost {
            REPLACEMENT_COST_FACTOR
        } else {
            1.0
        };
        let discount_percent = input.discount_percent();

        let rated = base_premium
            * location_factor
            * building_factor
            * credit
            * claims
            * deductible
            * replacement_cost_factor;
        let annual_premium = (rated * (1.0 - Percent(discount_percent).fraction())).max(MINIMUM_ANNUAL_PREMIUM);

        let protection_gap = 100.0
            - if input.has_security_system { 50.0 } else { 0.0 }
            - if input.has_smoke_detectors { 50.0 } else { 0.0 };
        let risk_score = WeightedScore::new()
            .add(input.location_risk.risk(), 0.3)
            .add(linear_score(input.claims_in_last5_years, 0.0, 4.0), 0.3)
            .add(linear_score(input.credit_score, 800.0, 550.0), 0.2)
            .add(protection_gap, 0.2)
            .score();

        RentersInsuranceResult {
            base_premium,
            location_factor,
            building_factor,
            credit_factor: credit,
            credit_tier: credit_tier(input.credit_score).to_string(),
            claims_factor: claims,
            deductible_factor: deductible,
            replacement_cost_factor,
            discount_percent,
            annual_premium,
            monthly_premium: annual_premium / 12.0,
            loss_of_use_coverage: Percent(LOSS_OF_USE_PERCENT).of(input.personal_property_value),
            medical_payments_coverage: step_lookup(
                input.liability_coverage,
                &MEDICAL_PAYMENTS,
                BASE_MEDICAL_PAYMENTS,
            ),
            risk_score,
        }
    }

    fn narrate(result: &RentersInsuranceResult, format: &NumberFormat) -> RentersInsuranceNarrative {
        let risk_level = match result.risk_score {
            s if s >= 60.0 => "High",
            s if s >= 35.0 => "Moderate",
            _ => "Low",
        }
        .to_string();

        let mut tips = Vec::new();
        if result.deductible_factor > 1.0 {
            tips.push("raising your deductible to $500 or more would lower the premium");
        }
        if result.claims_factor > 1.0 {
            tips.push("recent claims are adding a surcharge");
        }
        if result.discount_percent < SECURITY_DISCOUNT + SMOKE_DETECTOR_DISCOUNT {
            tips.push("a security system and smoke detectors qualify for discounts");
        }
        if result.replacement_cost_factor == 1.0 {
            tips.push("replacement-cost coverage pays to replace items at today's prices");
        }

        let mut recommendation = format!(
            "Estimated premium is {} per year ({} per month).",
            format.currency(result.annual_premium),
            format.currency(result.monthly_premium)
        );
        if let Some((first, rest)) = tips.split_first() {
            let mut first = first.to_string();
            if let Some(c) = first.get(..1) {
                let upper = c.to_uppercase();
                first.replace_range(..1, &upper);
            }
            recommendation.push(' ');
            recommendation.push_str(&first);
            for tip in rest {
                recommendation.push_str("; ");
                recommendation.push_str(tip);
            }
            recommendation.push('.');
        }

        RentersInsuranceNarrative {
            risk_level,
            recommendation,
        }
    }
}

static DESCRIPTOR: Lazy<CalculatorDescriptor> = Lazy::new(|| {
    CalculatorDescriptor::new(ID, "Renters Insurance Estimator", Category::Insurance, "property")
        .with_description("Estimate a renters insurance premium from coverage, location and risk factors.")
        .with_input(
            InputField::currency("personalPropertyValue", "Personal Property Value")
                .required()
                .range(5_000.0, 500_000.0)
                .step(1_000.0),
        )
        .with_input(
            InputField::currency("liabilityCoverage", "Liability Coverage")
                .required()
                .range(100_000.0, 1_000_000.0)
                .step(100_000.0),
        )
        .with_input(
            InputField::currency("deductible", "Deductible")
                .required()
                .range(100.0, 5_000.0)
                .step(50.0),
        )
        .with_input(
            InputField::select(
                "locationRisk",
                "Location Risk",
                &[("low", "Low"), ("moderate", "Moderate"), ("high", "High")],
            )
            .default_value("moderate"),
        )
        .with_input(
            InputField::select(
                "buildingType",
                "Building Type",
                &[
                    ("apartment", "Apartment"),
                    ("condo", "Condo"),
                    ("townhouse", "Townhouse"),
                    ("house", "House"),
                ],
            )
            .default_value("apartment"),
        )
        .with_input(
            InputField::number("creditScore", "Credit Score")
                .required()
                .range(300.0, 850.0),
        )
        .with_input(
            InputField::number("claimsInLast5Years", "Claims in Last 5 Years")
                .range(0.0, 10.0)
                .default_value(0.0),
        )
        .with_input(InputField::boolean("replacementCost", "Replacement Cost Coverage").default_value(false))
        .with_input(InputField::boolean("hasSecuritySystem", "Security System").default_value(false))
        .with_input(InputField::boolean("hasSmokeDetectors", "Smoke Detectors").default_value(false))
        .with_output(OutputField::new("basePremium", "Base Premium", OutputKind::Currency))
        .with_output(OutputField::new("locationFactor", "Location Factor", OutputKind::Number))
        .with_output(OutputField::new("buildingFactor", "Building Factor", OutputKind::Number))
        .with_output(OutputField::new("creditFactor", "Credit Factor", OutputKind::Number))
        .with_output(OutputField::new("creditTier", "Credit Tier", OutputKind::Text))
        .with_output(OutputField::new("claimsFactor", "Claims Factor", OutputKind::Number))
        .with_output(OutputField::new("deductibleFactor", "Deductible Factor", OutputKind::Number))
        .with_output(OutputField::new("replacementCostFactor", "Replacement Cost Factor", OutputKind::Number))
        .with_output(OutputField::new("discountPercent", "Discounts", OutputKind::Percentage))
        .with_output(OutputField::new("annualPremium", "Annual Premium", OutputKind::Currency))
        .with_output(OutputField::new("monthlyPremium", "Monthly Premium", OutputKind::Currency))
        .with_output(OutputField::new("lossOfUseCoverage", "Loss of Use Coverage", OutputKind::Currency))
        .with_output(OutputField::new("medicalPaymentsCoverage", "Medical Payments Coverage", OutputKind::Currency))
        .with_output(OutputField::new("riskScore", "Risk Score", OutputKind::Number))
        .with_output(OutputField::new("riskLevel", "Risk Level", OutputKind::Text))
        .with_output(OutputField::new("recommendation", "Recommendation", OutputKind::Text))
        .with_example(Example::new(
            "City apartment",
            "$30k of belongings with replacement-cost coverage and good credit.",
            InputRecord::from_typed(&RentersInsuranceInput::default()).unwrap_or_default(),
        ))
        .with_example(Example::new(
            "House in a high-risk area",
            "A rented house with prior claims and no protective devices.",
            InputRecord::new()
                .with("personalPropertyValue", 50_000.0)
                .with("liabilityCoverage", 300_000.0)
                .with("deductible", 1_000.0)
                .with("locationRisk", "high")
                .with("buildingType", "house")
                .with("creditScore", 620.0)
                .with("claimsInLast5Years", 2.0)
                .with("replacementCost", true),
        ))
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_tables() {
        assert_eq!(credit_factor(800.0), 0.85);
        assert_eq!(credit_factor(750.0), 0.85);
        assert_eq!(credit_factor(749.0), 0.95);
        assert_eq!(credit_factor(650.0), 1.0);
        assert_eq!(credit_factor(610.0), 1.15);
        assert_eq!(credit_factor(550.0), 1.3);
        assert_eq!(credit_tier(760.0), "excellent");
        assert_eq!(credit_tier(500.0), "poor");

        assert_eq!(claims_factor(0.0), 1.0);
        assert!((claims_factor(4.0) - 1.6).abs() < 1e-9);
        assert_eq!(claims_factor(10.0), 1.75);

        assert_eq!(deductible_factor(250.0), 1.1);
        assert_eq!(deductible_factor(500.0), 1.0);
        assert_eq!(deductible_factor(1_000.0), 0.85);
        assert_eq!(deductible_factor(5_000.0), 0.75);
    }

    #[test]
    fn test_default_premium() {
        let result = calculate(&RentersInsuranceInput::default()).unwrap();
        // 30 × $6 + $15 liability
        assert!((result.base_premium - 195.0).abs() < 1e-9);
        assert_eq!(result.credit_tier, "good");
        assert_eq!(result.discount_percent, 3.0);
        // 195 × 0.95 × 1.1 × 0.97
        assert!((result.annual_premium - 197.66).abs() < 0.01);
        assert!((result.monthly_premium - 16.47).abs() < 0.01);
        assert!((result.loss_of_use_coverage - 6_000.0).abs() < 1e-9);
        assert_eq!(result.medical_payments_coverage, 1_000.0);
    }

    #[test]
    fn test_minimum_premium() {
        let input = RentersInsuranceInput {
            personal_property_value: 5_000.0,
            deductible: 2_500.0,
            location_risk: LocationRisk::Low,
            credit_score: 800.0,
            replacement_cost: false,
            has_security_system: true,
            ..RentersInsuranceInput::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.annual_premium, 100.0);
    }

    #[test]
    fn test_premium_increases_with_property_value() {
        let mut previous = 0.0;
        for value in [10_000.0, 25_000.0, 60_000.0, 150_000.0] {
            let input = RentersInsuranceInput {
                personal_property_value: value,
                ..RentersInsuranceInput::default()
            };
            let premium = calculate(&input).unwrap().annual_premium;
            assert!(premium > previous);
            previous = premium;
        }
    }

    #[test]
    fn test_deductible_rules() {
        let input = RentersInsuranceInput {
            personal_property_value: 5_000.0,
            deductible: 5_000.0,
            ..RentersInsuranceInput::default()
        };
        assert!(validate(&input).has_error_for("deductible"));

        let input = RentersInsuranceInput {
            personal_property_value: 10_000.0,
            deductible: 2_000.0,
            ..RentersInsuranceInput::default()
        };
        let validation = validate(&input);
        assert!(validation.is_valid);
        assert!(validation.has_warning_for("deductible"));
    }

    #[test]
    fn test_claims_warning_and_risk() {
        let input = RentersInsuranceInput {
            claims_in_last5_years: 4.0,
            location_risk: LocationRisk::High,
            credit_score: 560.0,
            has_smoke_detectors: false,
            ..RentersInsuranceInput::default()
        };
        let validation = validate(&input);
        assert!(validation.has_warning_for("claimsInLast5Years"));

        let result = calculate(&input).unwrap();
        assert!(result.risk_score >= 60.0);
        let text = narrative(&result, &NumberFormat::default());
        assert_eq!(text.risk_level, "High");
        assert!(text.recommendation.contains("Recent claims are adding a surcharge"));
    }

    #[test]
    fn test_low_risk_narrative() {
        let input = RentersInsuranceInput {
            location_risk: LocationRisk::Low,
            credit_score: 800.0,
            has_security_system: true,
            ..RentersInsuranceInput::default()
        };
        let result = calculate(&input).unwrap();
        let text = narrative(&result, &NumberFormat::default());
        assert_eq!(text.risk_level, "Low");
        assert!(text.recommendation.starts_with("Estimated premium is $"));
        assert!(text.recommendation.ends_with("per month)."));
    }
}
