//! # USDA Loan Calculator
//!
//! Eligibility screen and payment estimate for a USDA Single Family Housing
//! Guaranteed loan.
//!
//! ## Program Constants
//!
//! | Item                    | Value                                         |
//! |-------------------------|-----------------------------------------------|
//! | Upfront guarantee fee   | 1.0% of the base loan, financed               |
//! | Annual guarantee fee    | 0.35% of the loan, paid monthly               |
//! | Income limit, 1-4       | $112,450                                      |
//! | Income limit, 5-8       | $148,450                                      |
//! | Each member above 8     | +8% of the 1-4 person limit                   |
//! | Credit score            | 640+ automated, 580-639 manual, <580 ineligible |
//! | Debt ratios             | 29% front-end, 41% back-end                   |
//!
//! Income limits vary by county; `areaIncomeLimit` overrides the standard
//! limit when the local figure is known.
//!
//! ## Example
//!
//! ```rust
//! use fincalc_core::calculators::usda_loan::{standard_income_limit, IncomeEligibility};
//!
//! assert_eq!(standard_income_limit(4), 112_450.0);
//! assert_eq!(IncomeEligibility::classify(120_000.0, 112_450.0), IncomeEligibility::Borderline);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::finance::{linear_score, monthly_payment, ratio, WeightedScore};
use crate::format::NumberFormat;
use crate::record::InputRecord;
use crate::schema::{CalculatorDescriptor, Category, Example, InputField, OutputField, OutputKind};
use crate::units::{Percent, Years};
use crate::validation::ValidationResult;

use super::{calculate_typed, validate_typed, TypedCalculator};

/// Calculator id
pub const ID: &str = "usda-loan";

pub const UPFRONT_FEE_PERCENT: f64 = 1.0;
pub const ANNUAL_FEE_PERCENT: f64 = 0.35;

const INCOME_LIMIT_1_TO_4: f64 = 112_450.0;
const INCOME_LIMIT_5_TO_8: f64 = 148_450.0;
const EXTRA_MEMBER_PERCENT: f64 = 8.0;
/// Incomes up to this multiple of the limit are borderline
const BORDERLINE_MULTIPLE: f64 = 1.15;

const AUTOMATED_CREDIT_SCORE: f64 = 640.0;
const MINIMUM_CREDIT_SCORE: f64 = 580.0;

const FRONT_END_LIMIT: f64 = 29.0;
const BACK_END_LIMIT: f64 = 41.0;

const DEFAULT_LOAN_TERM: f64 = 30.0;

/// Standard household income limit for a household size
pub fn standard_income_limit(household_size: u32) -> f64 {
    match household_size {
        0..=4 => INCOME_LIMIT_1_TO_4,
        5..=8 => INCOME_LIMIT_5_TO_8,
        n => {
            INCOME_LIMIT_5_TO_8
                + (n - 8) as f64 * Percent(EXTRA_MEMBER_PERCENT).of(INCOME_LIMIT_1_TO_4)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeEligibility {
    Eligible,
    Borderline,
    #[serde(rename = "Not Eligible")]
    NotEligible,
}

impl IncomeEligibility {
    pub fn classify(income: f64, limit: f64) -> IncomeEligibility {
        if income <= limit {
            IncomeEligibility::Eligible
        } else if income <= limit * BORDERLINE_MULTIPLE {
            IncomeEligibility::Borderline
        } else {
            IncomeEligibility::NotEligible
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditEligibility {
    #[serde(rename = "Automated Approval")]
    Automated,
    #[serde(rename = "Manual Underwriting")]
    ManualUnderwriting,
    #[serde(rename = "Not Eligible")]
    NotEligible,
}

impl CreditEligibility {
    pub fn classify(score: f64) -> CreditEligibility {
        if score >= AUTOMATED_CREDIT_SCORE {
            CreditEligibility::Automated
        } else if score >= MINIMUM_CREDIT_SCORE {
            CreditEligibility::ManualUnderwriting
        } else {
            CreditEligibility::NotEligible
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallEligibility {
    #[serde(rename = "Likely Eligible")]
    LikelyEligible,
    #[serde(rename = "Possibly Eligible")]
    PossiblyEligible,
    #[serde(rename = "Not Eligible")]
    NotEligible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaLoanInput {
    pub purchase_price: f64,
    #[serde(default)]
    pub down_payment: f64,
    pub household_size: f64,
    pub annual_household_income: f64,
    /// County income limit, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_income_limit: Option<f64>,
    pub credit_score: f64,
    #[serde(default)]
    pub monthly_debts: f64,
    pub interest_rate: f64,
    #[serde(default = "default_loan_term")]
    pub loan_term: f64,
    #[serde(default)]
    pub monthly_taxes_and_insurance: f64,
    #[serde(default = "default_true")]
    pub property_in_eligible_area: bool,
}

fn default_loan_term() -> f64 {
    DEFAULT_LOAN_TERM
}

fn default_true() -> bool {
    true
}

impl Default for UsdaLoanInput {
    fn default() -> Self {
        UsdaLoanInput {
            purchase_price: 250_000.0,
            down_payment: 0.0,
            household_size: 4.0,
            annual_household_income: 85_000.0,
            area_income_limit: None,
            credit_score: 680.0,
            monthly_debts: 400.0,
            interest_rate: 6.25,
            loan_term: DEFAULT_LOAN_TERM,
            monthly_taxes_and_insurance: 350.0,
            property_in_eligible_area: true,
        }
    }
}

impl UsdaLoanInput {
    pub fn income_limit(&self) -> f64 {
        self.area_income_limit
            .unwrap_or_else(|| standard_income_limit(self.household_size.round().max(1.0) as u32))
    }

    pub fn base_loan_amount(&self) -> f64 {
        (self.purchase_price - self.down_payment).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaLoanResult {
    pub income_limit: f64,
    pub income_eligibility: IncomeEligibility,
    /// "Eligible" or "Not Eligible"
    pub property_eligibility: String,
    pub credit_eligibility: CreditEligibility,
    pub base_loan_amount: f64,
    pub upfront_guarantee_fee: f64,
    pub total_loan_amount: f64,
    pub monthly_principal_and_interest: f64,
    pub monthly_guarantee_fee: f64,
    pub total_monthly_payment: f64,
    /// Housing payment / gross monthly income (%)
    pub front_end_ratio: Option<f64>,
    /// Housing payment plus debts / gross monthly income (%)
    pub back_end_ratio: Option<f64>,
    pub eligibility_score: f64,
    pub overall_eligibility: OverallEligibility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaLoanNarrative {
    pub recommendation: String,
}

pub fn validate(input: &UsdaLoanInput) -> ValidationResult {
    validate_typed::<UsdaLoanCalculator>(input)
}

pub fn calculate(input: &UsdaLoanInput) -> CalcResult<UsdaLoanResult> {
    calculate_typed::<UsdaLoanCalculator>(input)
}

pub fn narrative(result: &UsdaLoanResult, format: &NumberFormat) -> UsdaLoanNarrative {
    UsdaLoanCalculator::narrate(result, format)
}

pub struct UsdaLoanCalculator;

impl TypedCalculator for UsdaLoanCalculator {
    type Input = UsdaLoanInput;
    type Result = UsdaLoanResult;
    type Narrative = UsdaLoanNarrative;

    fn descriptor() -> &'static CalculatorDescriptor {
        &DESCRIPTOR
    }

    fn check_rules(input: &UsdaLoanInput, result: &mut ValidationResult) {
        if input.down_payment > input.purchase_price {
            result.error("downPayment", "Down payment cannot exceed the purchase price");
            return;
        }
        if input.down_payment > 0.0 {
            result.warning(
                "downPayment",
                "USDA loans do not require a down payment; you may be able to keep this cash",
            );
        }
        if input.credit_score < AUTOMATED_CREDIT_SCORE {
            result.warning(
                "creditScore",
                "Credit scores below 640 require manual underwriting",
            );
        }
    }

    fn compute(input: &UsdaLoanInput) -> UsdaLoanResult {
        let income_limit = input.income_limit();
        let income_eligibility =
            IncomeEligibility::classify(input.annual_household_income, income_limit);
        let credit_eligibility = CreditEligibility::classify(input.credit_score);

        let base_loan_amount = input.base_loan_amount();
        let upfront_guarantee_fee = Percent(UPFRONT_FEE_PERCENT).of(base_loan_amount);
        let total_loan_amount = base_loan_amount + upfront_guarantee_fee;
        let monthly_principal_and_interest = monthly_payment(
            total_loan_amount,
            Percent(input.interest_rate),
            Years(input.loan_term),
        );
        let monthly_guarantee_fee = Percent(ANNUAL_FEE_PERCENT).of(total_loan_amount) / 12.0;
        let total_monthly_payment = monthly_principal_and_interest
            + monthly_guarantee_fee
            + input.monthly_taxes_and_insurance;

        let monthly_income = input.annual_household_income / 12.0;
        let front_end_ratio = ratio(total_monthly_payment, monthly_income).map(|r| r * 100.0);
        let back_end_ratio =
            ratio(total_monthly_payment + input.monthly_debts, monthly_income).map(|r| r * 100.0);

        let eligibility_score = WeightedScore::new()
            .add(
                match income_eligibility {
                    IncomeEligibility::Eligible => 100.0,
                    IncomeEligibility::Borderline => 50.0,
                    IncomeEligibility::NotEligible => 0.0,
                },
                0.3,
            )
            .add(if input.property_in_eligible_area { 100.0 } else { 0.0 }, 0.2)
            .add(linear_score(input.credit_score, MINIMUM_CREDIT_SCORE, 700.0), 0.2)
            .add(front_end_ratio.map_or(0.0, |r| linear_score(r, 35.0, FRONT_END_LIMIT)), 0.15)
            .add(back_end_ratio.map_or(0.0, |r| linear_score(r, 47.0, BACK_END_LIMIT)), 0.15)
            .score();

        let blocked = income_eligibility == IncomeEligibility::NotEligible
            || !input.property_in_eligible_area
            || credit_eligibility == CreditEligibility::NotEligible;
        let clean = income_eligibility == IncomeEligibility::Eligible
            && credit_eligibility == CreditEligibility::Automated
            && front_end_ratio.is_some_and(|r| r <= FRONT_END_LIMIT)
            && back_end_ratio.is_some_and(|r| r <= BACK_END_LIMIT);
        let overall_eligibility = if blocked {
            OverallEligibility::NotEligible
        } else if clean {
            OverallEligibility::LikelyEligible
        } else {
            OverallEligibility::PossiblyEligible
        };

        UsdaLoanResult {
            income_limit,
            income_eligibility,
            property_eligibility: if input.property_in_eligible_area {
                "Eligible".to_string()
            } else {
                "Not Eligible".to_string()
            },
            credit_eligibility,
            base_loan_amount,
            upfront_guarantee_fee,
            total_loan_amount,
            monthly_principal_and_interest,
            monthly_guarantee_fee,
            total_monthly_payment,
            front_end_ratio,
            back_end_ratio,
            eligibility_score,
            overall_eligibility,
        }
    }

    fn narrate(result: &UsdaLoanResult, format: &NumberFormat) -> UsdaLoanNarrative {
        let recommendation = match result.overall_eligibility {
            OverallEligibility::LikelyEligible => format!(
                "You appear to qualify for a USDA loan of {} with an estimated payment of {} per month.",
                format.currency(result.total_loan_amount),
                format.currency(result.total_monthly_payment)
            ),
            OverallEligibility::PossiblyEligible => {
                let mut concerns = Vec::new();
                if result.income_eligibility == IncomeEligibility::Borderline {
                    concerns.push(format!(
                        "income is slightly above the {} limit",
                        format.currency(result.income_limit)
                    ));
                }
                if result.credit_eligibility == CreditEligibility::ManualUnderwriting {
                    concerns.push("your credit score requires manual underwriting".to_string());
                }
                if result.front_end_ratio.is_some_and(|r| r > FRONT_END_LIMIT)
                    || result.back_end_ratio.is_some_and(|r| r > BACK_END_LIMIT)
                {
                    concerns.push("debt ratios exceed the 29%/41% guidelines".to_string());
                }
                if concerns.is_empty() {
                    concerns.push("income could not be verified".to_string());
                }
                format!(
                    "You may qualify, but a lender will need to review: {}.",
                    concerns.join("; ")
                )
            }
            OverallEligibility::NotEligible => {
                let reason = if result.property_eligibility != "Eligible" {
                    "the property is outside a USDA-eligible area".to_string()
                } else if result.income_eligibility == IncomeEligibility::NotEligible {
                    format!(
                        "household income exceeds the {} limit",
                        format.currency(result.income_limit)
                    )
                } else {
                    "credit scores below 580 are not accepted".to_string()
                };
                format!(
                    "This purchase does not meet USDA requirements because {}; consider an FHA or conventional loan.",
                    reason
                )
            }
        };

        UsdaLoanNarrative { recommendation }
    }
}

static DESCRIPTOR: Lazy<CalculatorDescriptor> = Lazy::new(|| {
    CalculatorDescriptor::new(ID, "USDA Loan Calculator", Category::Finance, "mortgage")
        .with_description(
            "Check USDA guaranteed loan eligibility and estimate the monthly payment including guarantee fees.",
        )
        .with_input(
            InputField::currency("purchasePrice", "Purchase Price")
                .required()
                .range(10_000.0, 2_000_000.0)
                .step(1_000.0),
        )
        .with_input(
            InputField::currency("downPayment", "Down Payment")
                .range(0.0, 2_000_000.0)
                .default_value(0.0),
        )
        .with_input(
            InputField::number("householdSize", "Household Size")
                .required()
                .range(1.0, 12.0)
                .step(1.0),
        )
        .with_input(
            InputField::currency("annualHouseholdIncome", "Annual Household Income")
                .required()
                .range(0.0, 1_000_000.0)
                .step(1_000.0),
        )
        .with_input(
            InputField::currency("areaIncomeLimit", "Area Income Limit")
                .range(10_000.0, 1_000_000.0)
                .help("County limit; leave blank to use the standard limit"),
        )
        .with_input(
            InputField::number("creditScore", "Credit Score")
                .required()
                .range(300.0, 850.0),
        )
        .with_input(
            InputField::currency("monthlyDebts", "Monthly Debt Payments")
                .range(0.0, 50_000.0)
                .default_value(0.0),
        )
        .with_input(
            InputField::percentage("interestRate", "Interest Rate")
                .required()
                .range(0.5, 15.0)
                .step(0.125),
        )
        .with_input(
            InputField::number("loanTerm", "Loan Term (years)")
                .range(15.0, 30.0)
                .default_value(DEFAULT_LOAN_TERM),
        )
        .with_input(
            InputField::currency("monthlyTaxesAndInsurance", "Monthly Taxes & Insurance")
                .range(0.0, 20_000.0)
                .default_value(0.0),
        )
        .with_input(
            InputField::boolean("propertyInEligibleArea", "Property in USDA-Eligible Area")
                .default_value(true),
        )
        .with_output(OutputField::new("incomeLimit", "Income Limit", OutputKind::Currency))
        .with_output(OutputField::new("incomeEligibility", "Income Eligibility", OutputKind::Text))
        .with_output(OutputField::new("propertyEligibility", "Property Eligibility", OutputKind::Text))
        .with_output(OutputField::new("creditEligibility", "Credit Eligibility", OutputKind::Text))
        .with_output(OutputField::new("baseLoanAmount", "Base Loan", OutputKind::Currency))
        .with_output(OutputField::new("upfrontGuaranteeFee", "Upfront Guarantee Fee", OutputKind::Currency))
        .with_output(OutputField::new("totalLoanAmount", "Total Loan", OutputKind::Currency))
        .with_output(OutputField::new("monthlyPrincipalAndInterest", "Principal & Interest", OutputKind::Currency))
        .with_output(OutputField::new("monthlyGuaranteeFee", "Monthly Guarantee Fee", OutputKind::Currency))
        .with_output(OutputField::new("totalMonthlyPayment", "Total Monthly Payment", OutputKind::Currency))
        .with_output(OutputField::new("frontEndRatio", "Front-End Ratio", OutputKind::Percentage))
        .with_output(OutputField::new("backEndRatio", "Back-End Ratio", OutputKind::Percentage))
        .with_output(OutputField::new("eligibilityScore", "Eligibility Score", OutputKind::Number))
        .with_output(OutputField::new("overallEligibility", "Overall Eligibility", OutputKind::Text))
        .with_output(OutputField::new("recommendation", "Recommendation", OutputKind::Text))
        .with_example(Example::new(
            "Family of four",
            "A $250k rural home with no down payment.",
            InputRecord::from_typed(&UsdaLoanInput::default()).unwrap_or_default(),
        ))
        .with_example(Example::new(
            "Large household near the limit",
            "A household of ten with income just above the standard limit.",
            InputRecord::new()
                .with("purchasePrice", 320_000.0)
                .with("householdSize", 10.0)
                .with("annualHouseholdIncome", 175_000.0)
                .with("creditScore", 620.0)
                .with("monthlyDebts", 600.0)
                .with("interestRate", 6.5)
                .with("monthlyTaxesAndInsurance", 450.0),
        ))
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_income_limits() {
        assert_eq!(standard_income_limit(1), 112_450.0);
        assert_eq!(standard_income_limit(4), 112_450.0);
        assert_eq!(standard_income_limit(5), 148_450.0);
        assert_eq!(standard_income_limit(8), 148_450.0);
        // two extra members at 8% of 112,450 each
        assert!((standard_income_limit(10) - 166_442.0).abs() < 1e-6);
    }

    #[test]
    fn test_income_bands_for_household_of_four() {
        let at_limit = UsdaLoanInput {
            annual_household_income: 112_450.0,
            ..UsdaLoanInput::default()
        };
        assert_eq!(
            calculate(&at_limit).unwrap().income_eligibility,
            IncomeEligibility::Eligible
        );

        let borderline = UsdaLoanInput {
            annual_household_income: 120_000.0,
            ..UsdaLoanInput::default()
        };
        assert_eq!(
            calculate(&borderline).unwrap().income_eligibility,
            IncomeEligibility::Borderline
        );

        let above = UsdaLoanInput {
            annual_household_income: 112_450.0 * 1.15 + 1.0,
            ..UsdaLoanInput::default()
        };
        let result = calculate(&above).unwrap();
        assert_eq!(result.income_eligibility, IncomeEligibility::NotEligible);
        assert_eq!(result.overall_eligibility, OverallEligibility::NotEligible);
    }

    #[test]
    fn test_payment_breakdown() {
        let result = calculate(&UsdaLoanInput::default()).unwrap();
        assert!((result.upfront_guarantee_fee - 2_500.0).abs() < 1e-9);
        assert!((result.total_loan_amount - 252_500.0).abs() < 1e-9);
        assert!((result.monthly_principal_and_interest - 1554.69).abs() < 0.01);
        assert!((result.monthly_guarantee_fee - 73.65).abs() < 0.01);
        assert!((result.total_monthly_payment - 1978.33).abs() < 0.01);
        assert!((result.front_end_ratio.unwrap() - 27.93).abs() < 0.01);
        assert!((result.back_end_ratio.unwrap() - 33.58).abs() < 0.01);
        assert_eq!(result.overall_eligibility, OverallEligibility::LikelyEligible);
    }

    #[test]
    fn test_credit_tiers() {
        assert_eq!(CreditEligibility::classify(700.0), CreditEligibility::Automated);
        assert_eq!(CreditEligibility::classify(640.0), CreditEligibility::Automated);
        assert_eq!(CreditEligibility::classify(600.0), CreditEligibility::ManualUnderwriting);
        assert_eq!(CreditEligibility::classify(579.0), CreditEligibility::NotEligible);

        let input = UsdaLoanInput {
            credit_score: 600.0,
            ..UsdaLoanInput::default()
        };
        let validation = validate(&input);
        assert!(validation.is_valid);
        assert!(validation.has_warning_for("creditScore"));
        let result = calculate(&input).unwrap();
        assert_eq!(result.overall_eligibility, OverallEligibility::PossiblyEligible);
        let text = narrative(&result, &NumberFormat::default());
        assert!(text.recommendation.contains("manual underwriting"));
    }

    #[test]
    fn test_area_limit_override() {
        let input = UsdaLoanInput {
            area_income_limit: Some(80_000.0),
            ..UsdaLoanInput::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.income_limit, 80_000.0);
        assert_eq!(result.income_eligibility, IncomeEligibility::Borderline);
    }

    #[test]
    fn test_ineligible_area() {
        let input = UsdaLoanInput {
            property_in_eligible_area: false,
            ..UsdaLoanInput::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.property_eligibility, "Not Eligible");
        assert_eq!(result.overall_eligibility, OverallEligibility::NotEligible);
        let text = narrative(&result, &NumberFormat::default());
        assert!(text.recommendation.contains("outside a USDA-eligible area"));
    }

    #[test]
    fn test_down_payment_rules() {
        let input = UsdaLoanInput {
            down_payment: 300_000.0,
            ..UsdaLoanInput::default()
        };
        assert!(validate(&input).has_error_for("downPayment"));

        let input = UsdaLoanInput {
            down_payment: 10_000.0,
            ..UsdaLoanInput::default()
        };
        let validation = validate(&input);
        assert!(validation.is_valid);
        assert!(validation.has_warning_for("downPayment"));
    }

    #[test]
    fn test_zero_income_has_no_ratios() {
        let input = UsdaLoanInput {
            annual_household_income: 0.0,
            ..UsdaLoanInput::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.front_end_ratio, None);
        assert_eq!(result.back_end_ratio, None);
        assert_eq!(result.overall_eligibility, OverallEligibility::PossiblyEligible);
    }

    #[test]
    fn test_eligibility_labels_serialize() {
        let json = serde_json::to_value(calculate(&UsdaLoanInput::default()).unwrap()).unwrap();
        assert_eq!(json["incomeEligibility"], "Eligible");
        assert_eq!(json["creditEligibility"], "Automated Approval");
        assert_eq!(json["overallEligibility"], "Likely Eligible");
        assert_eq!(
            serde_json::to_value(IncomeEligibility::NotEligible).unwrap(),
            "Not Eligible"
        );
    }
}
