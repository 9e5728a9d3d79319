//! # Mortgage Points Calculator
//!
//! Compares a loan with and without discount points: the upfront cost of the
//! points, the rate reduction they buy, the monthly savings, and how long the
//! savings take to repay the cost.
//!
//! ## Assumptions
//!
//! - One point costs 1% of the loan amount
//! - Each point lowers the rate by `rateReductionPerPoint` (0.25% by default)
//! - Fixed-rate, fully amortizing loan
//!
//! ## Example
//!
//! ```rust
//! use fincalc_core::calculators::mortgage_points::{calculate, MortgagePointsInput};
//!
//! let input = MortgagePointsInput {
//!     loan_amount: 300_000.0,
//!     base_interest_rate: 6.75,
//!     discount_points: 2.0,
//!     ..MortgagePointsInput::default()
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.points_cost, 6_000.0);
//! assert_eq!(result.effective_rate_with_points, 6.25);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::finance::{monthly_payment, total_interest, Horizon};
use crate::format::NumberFormat;
use crate::record::InputRecord;
use crate::schema::{CalculatorDescriptor, Category, Example, InputField, OutputField, OutputKind};
use crate::units::{Percent, Years};
use crate::validation::ValidationResult;

use super::{calculate_typed, validate_typed, TypedCalculator};

/// Calculator id
pub const ID: &str = "mortgage-points";

const DEFAULT_LOAN_TERM_YEARS: f64 = 30.0;
const DEFAULT_RATE_REDUCTION_PER_POINT: f64 = 0.25;
const DEFAULT_EXPECTED_YEARS: f64 = 7.0;

/// Rates above this are flagged as unusual
const HIGH_RATE_WARNING: f64 = 10.0;
/// Lenders rarely sell more than this many points
const MAX_TYPICAL_POINTS: f64 = 4.0;

/// Input parameters for the mortgage points comparison.
///
/// ## JSON Example
///
/// ```json
/// {
///   "loanAmount": 300000,
///   "baseInterestRate": 6.75,
///   "discountPoints": 2,
///   "loanTerm": 30,
///   "rateReductionPerPoint": 0.25,
///   "expectedYearsInHome": 7,
///   "marginalTaxRate": 22
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgagePointsInput {
    /// Loan principal
    pub loan_amount: f64,

    /// Quoted rate without points (%)
    pub base_interest_rate: f64,

    /// Number of discount points purchased
    pub discount_points: f64,

    /// Loan term in years
    #[serde(default = "default_loan_term")]
    pub loan_term: f64,

    /// Rate reduction bought by each point (percentage points)
    #[serde(default = "default_rate_reduction")]
    pub rate_reduction_per_point: f64,

    /// How long the borrower expects to keep the loan (years)
    #[serde(default = "default_expected_years")]
    pub expected_years_in_home: f64,

    /// Marginal income tax rate for the points deduction (%)
    #[serde(default)]
    pub marginal_tax_rate: f64,
}

fn default_loan_term() -> f64 {
    DEFAULT_LOAN_TERM_YEARS
}

fn default_rate_reduction() -> f64 {
    DEFAULT_RATE_REDUCTION_PER_POINT
}

fn default_expected_years() -> f64 {
    DEFAULT_EXPECTED_YEARS
}

impl Default for MortgagePointsInput {
    fn default() -> Self {
        MortgagePointsInput {
            loan_amount: 300_000.0,
            base_interest_rate: 6.75,
            discount_points: 1.0,
            loan_term: DEFAULT_LOAN_TERM_YEARS,
            rate_reduction_per_point: DEFAULT_RATE_REDUCTION_PER_POINT,
            expected_years_in_home: DEFAULT_EXPECTED_YEARS,
            marginal_tax_rate: 0.0,
        }
    }
}

impl MortgagePointsInput {
    /// Upfront cost of the points: 1% of the loan per point
    pub fn points_cost(&self) -> f64 {
        self.loan_amount * self.discount_points / 100.0
    }

    /// Rate after buying points (%)
    pub fn effective_rate(&self) -> f64 {
        self.base_interest_rate - self.discount_points * self.rate_reduction_per_point
    }
}

/// Results of the points comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgagePointsResult {
    pub points_cost: f64,
    pub effective_rate_with_points: f64,
    pub monthly_payment_without_points: f64,
    pub monthly_payment_with_points: f64,
    pub monthly_savings: f64,
    /// Months of savings needed to recover the points cost
    pub break_even_months: Horizon,
    pub total_interest_without_points: f64,
    pub total_interest_with_points: f64,
    /// Interest saved over the full term, net of the points cost
    pub lifetime_savings: f64,
    /// Savings over the expected stay, net of the points cost
    pub savings_over_expected_stay: f64,
    /// Estimated tax value of deducting the points
    pub points_tax_deduction: f64,
    /// Whether break-even falls within the expected stay
    pub breaks_even_before_move: bool,
    pub discount_points: f64,
    pub base_interest_rate: f64,
    pub expected_years_in_home: f64,
}

/// Presentation text for a points comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgagePointsNarrative {
    pub summary: String,
    pub recommendation: String,
}

/// Validate input parameters.
pub fn validate(input: &MortgagePointsInput) -> ValidationResult {
    validate_typed::<MortgagePointsCalculator>(input)
}

/// Calculate the points comparison.
///
/// # Returns
///
/// * `Ok(MortgagePointsResult)` - Calculation results
/// * `Err(CalcError::ValidationFailed)` - If inputs are invalid
pub fn calculate(input: &MortgagePointsInput) -> CalcResult<MortgagePointsResult> {
    calculate_typed::<MortgagePointsCalculator>(input)
}

/// Render the narrative for a computed result.
pub fn narrative(result: &MortgagePointsResult, format: &NumberFormat) -> MortgagePointsNarrative {
    MortgagePointsCalculator::narrate(result, format)
}

/// Mortgage points calculator.
pub struct MortgagePointsCalculator;

impl TypedCalculator for MortgagePointsCalculator {
    type Input = MortgagePointsInput;
    type Result = MortgagePointsResult;
    type Narrative = MortgagePointsNarrative;

    fn descriptor() -> &'static CalculatorDescriptor {
        &DESCRIPTOR
    }

    fn check_rules(input: &MortgagePointsInput, result: &mut ValidationResult) {
        if input.effective_rate() <= 0.0 {
            result.error(
                "discountPoints",
                "Discount points cannot reduce the interest rate to zero or below",
            );
        }
        if input.base_interest_rate > HIGH_RATE_WARNING {
            result.warning(
                "baseInterestRate",
                "An interest rate above 10% is unusually high; double-check the quote",
            );
        }
        if input.discount_points > MAX_TYPICAL_POINTS {
            result.warning(
                "discountPoints",
                "Most lenders cap discount points at 4; confirm availability",
            );
        }
    }

    fn compute(input: &MortgagePointsInput) -> MortgagePointsResult {
        let term = Years(input.loan_term);
        let base_rate = Percent(input.base_interest_rate);
        let effective_rate = input.effective_rate();
        let points_rate = Percent(effective_rate);
        let points_cost = input.points_cost();

        let payment_without = monthly_payment(input.loan_amount, base_rate, term);
        let payment_with = monthly_payment(input.loan_amount, points_rate, term);
        let monthly_savings = payment_without - payment_with;

        let interest_without = total_interest(input.loan_amount, base_rate, term);
        let interest_with = total_interest(input.loan_amount, points_rate, term);

        let break_even_months = Horizon::from_ratio(points_cost, monthly_savings);
        let stay_months = input.expected_years_in_home * 12.0;

        MortgagePointsResult {
            points_cost,
            effective_rate_with_points: effective_rate,
            monthly_payment_without_points: payment_without,
            monthly_payment_with_points: payment_with,
            monthly_savings,
            break_even_months,
            total_interest_without_points: interest_without,
            total_interest_with_points: interest_with,
            lifetime_savings: interest_without - interest_with - points_cost,
            savings_over_expected_stay: monthly_savings * stay_months - points_cost,
            points_tax_deduction: Percent(input.marginal_tax_rate).of(points_cost),
            breaks_even_before_move: break_even_months.within(stay_months),
            discount_points: input.discount_points,
            base_interest_rate: input.base_interest_rate,
            expected_years_in_home: input.expected_years_in_home,
        }
    }

    fn narrate(result: &MortgagePointsResult, format: &NumberFormat) -> MortgagePointsNarrative {
        if result.discount_points == 0.0 {
            return MortgagePointsNarrative {
                summary: format!(
                    "No discount points purchased; the base rate of {} applies.",
                    format.percent(result.base_interest_rate)
                ),
                recommendation: "Compare a quote with points to see whether buying down the rate pays off."
                    .to_string(),
            };
        }

        let summary = format!(
            "{} points cost {} and lower the rate from {} to {}, saving {} per month.",
            result.discount_points,
            format.currency(result.points_cost),
            format.percent(result.base_interest_rate),
            format.percent(result.effective_rate_with_points),
            format.currency(result.monthly_savings),
        );

        let recommendation = match result.break_even_months {
            Horizon::Never => {
                "Paying points does not lower the monthly payment, so the upfront cost is never recovered."
                    .to_string()
            }
            horizon if result.breaks_even_before_move => format!(
                "Buying points pays for itself in {}, before your expected stay of {} years, \
                 for net savings of {} while you own the home.",
                format.horizon_months(&horizon),
                result.expected_years_in_home,
                format.currency(result.savings_over_expected_stay),
            ),
            horizon => format!(
                "Break-even takes {}, longer than your expected stay of {} years; \
                 keeping the cash is likely the better choice.",
                format.horizon_months(&horizon),
                result.expected_years_in_home,
            ),
        };

        MortgagePointsNarrative {
            summary,
            recommendation,
        }
    }
}

static DESCRIPTOR: Lazy<CalculatorDescriptor> = Lazy::new(|| {
    CalculatorDescriptor::new(ID, "Mortgage Points Calculator", Category::Finance, "mortgage")
        .with_description("Decide whether paying discount points to lower your mortgage rate is worth it.")
        .with_input(
            InputField::currency("loanAmount", "Loan Amount")
                .required()
                .range(10_000.0, 10_000_000.0)
                .step(1_000.0),
        )
        .with_input(
            InputField::percentage("baseInterestRate", "Base Interest Rate")
                .required()
                .range(0.5, 20.0)
                .step(0.125),
        )
        .with_input(
            InputField::number("discountPoints", "Discount Points")
                .required()
                .range(0.0, 5.0)
                .step(0.125)
                .help("Each point costs 1% of the loan amount"),
        )
        .with_input(
            InputField::number("loanTerm", "Loan Term (years)")
                .range(5.0, 40.0)
                .step(5.0)
                .default_value(DEFAULT_LOAN_TERM_YEARS),
        )
        .with_input(
            InputField::percentage("rateReductionPerPoint", "Rate Reduction per Point")
                .range(0.05, 0.5)
                .step(0.025)
                .default_value(DEFAULT_RATE_REDUCTION_PER_POINT),
        )
        .with_input(
            InputField::number("expectedYearsInHome", "Expected Years in Home")
                .range(1.0, 40.0)
                .default_value(DEFAULT_EXPECTED_YEARS),
        )
        .with_input(
            InputField::percentage("marginalTaxRate", "Marginal Tax Rate")
                .range(0.0, 50.0)
                .default_value(0.0),
        )
        .with_output(OutputField::new("pointsCost", "Cost of Points", OutputKind::Currency))
        .with_output(OutputField::new("effectiveRateWithPoints", "Rate with Points", OutputKind::Percentage))
        .with_output(OutputField::new("monthlyPaymentWithoutPoints", "Payment without Points", OutputKind::Currency))
        .with_output(OutputField::new("monthlyPaymentWithPoints", "Payment with Points", OutputKind::Currency))
        .with_output(OutputField::new("monthlySavings", "Monthly Savings", OutputKind::Currency))
        .with_output(OutputField::new("breakEvenMonths", "Break-even", OutputKind::Horizon))
        .with_output(OutputField::new("totalInterestWithoutPoints", "Total Interest without Points", OutputKind::Currency))
        .with_output(OutputField::new("totalInterestWithPoints", "Total Interest with Points", OutputKind::Currency))
        .with_output(OutputField::new("lifetimeSavings", "Lifetime Savings", OutputKind::Currency))
        .with_output(OutputField::new("savingsOverExpectedStay", "Savings over Expected Stay", OutputKind::Currency))
        .with_output(OutputField::new("pointsTaxDeduction", "Tax Value of Points", OutputKind::Currency))
        .with_output(OutputField::new("summary", "Summary", OutputKind::Text))
        .with_output(OutputField::new("recommendation", "Recommendation", OutputKind::Text))
        .with_example(Example::new(
            "Two points on a $300k loan",
            "Buying the rate down from 6.75% to 6.25% with a seven-year horizon.",
            InputRecord::new()
                .with("loanAmount", 300_000.0)
                .with("baseInterestRate", 6.75)
                .with("discountPoints", 2.0)
                .with("loanTerm", 30.0)
                .with("expectedYearsInHome", 7.0),
        ))
        .with_example(Example::new(
            "Short stay",
            "One point when the borrower plans to move in three years.",
            InputRecord::new()
                .with("loanAmount", 450_000.0)
                .with("baseInterestRate", 7.125)
                .with("discountPoints", 1.0)
                .with("expectedYearsInHome", 3.0),
        ))
});
