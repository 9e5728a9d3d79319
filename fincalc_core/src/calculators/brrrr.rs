//! # BRRRR Strategy Calculator
//!
//! Buy, Rehab, Rent, Refinance, Repeat: an investor buys a distressed
//! property with a purchase loan, rehabilitates it, rents it out, then
//! refinances against the after-repair value (ARV) to pull capital back out.
//!
//! ## Timeline
//!
//! ```text
//! buy ──(rehabMonths of purchase-loan payments)──> refinance at ARV × LTV
//!                                                   │
//!                    cash out = refinance loan − purchase-loan balance
//!                    cash left in deal = total investment − cash out
//! ```
//!
//! ## Assumptions
//!
//! - Total investment is the investor's cash: down payment + rehab + closing
//! - Purchase-loan payments during rehab are reported as holding costs,
//!   not added to the investment
//! - Operating figures after refinance: rent less vacancy, less expenses,
//!   less the refinanced debt service
//!
//! ## Example
//!
//! ```rust
//! use fincalc_core::calculators::brrrr::{calculate, BrrrrInput};
//!
//! let input = BrrrrInput::default();
//! let result = calculate(&input).unwrap();
//!
//! assert_eq!(result.total_investment, 63_000.0);
//! println!("Cash out at refinance: {:.0}", result.cash_out_amount);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::finance::{
    cap_rate, cash_on_cash, dscr, grow, linear_score, monthly_payment, remaining_balance, Horizon,
    WeightedScore,
};
use crate::format::NumberFormat;
use crate::record::InputRecord;
use crate::schema::{CalculatorDescriptor, Category, Example, InputField, OutputField, OutputKind};
use crate::units::{Percent, Years};
use crate::validation::ValidationResult;

use super::{calculate_typed, validate_typed, TypedCalculator};

/// Calculator id
pub const ID: &str = "brrrr";

const DEFAULT_REHAB_MONTHS: f64 = 6.0;
const DEFAULT_APPRECIATION: f64 = 3.0;

/// Rehab above this share of the purchase price is flagged
const REHAB_WARNING_RATIO: f64 = 0.5;
/// The "1% rule": monthly rent should be at least 1% of the all-in cost
const ONE_PERCENT_RULE: f64 = 0.01;
/// Years covered by the projection table
const PROJECTION_YEARS: u32 = 5;

/// Input parameters for a BRRRR deal.
///
/// ## JSON Example
///
/// ```json
/// {
///   "purchasePrice": 150000,
///   "downPayment": 30000,
///   "rehabCost": 25000,
///   "closingCosts": 8000,
///   "purchaseLoanRate": 7.5,
///   "purchaseLoanTerm": 30,
///   "afterRepairValue": 220000,
///   "monthlyRent": 1800,
///   "monthlyExpenses": 400,
///   "refinanceRate": 6.5,
///   "refinanceTerm": 30,
///   "refinanceLTV": 75
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrrrrInput {
    pub purchase_price: f64,
    pub down_payment: f64,
    pub rehab_cost: f64,
    pub closing_costs: f64,

    /// Purchase (acquisition) loan rate (%)
    pub purchase_loan_rate: f64,
    /// Purchase loan term (years)
    pub purchase_loan_term: f64,

    /// Appraised value once rehab is complete
    pub after_repair_value: f64,
    pub monthly_rent: f64,
    /// Operating expenses: taxes, insurance, maintenance, management
    pub monthly_expenses: f64,

    /// Refinance loan rate (%)
    pub refinance_rate: f64,
    /// Refinance loan term (years)
    pub refinance_term: f64,
    /// Refinance loan-to-value (%)
    #[serde(rename = "refinanceLTV")]
    pub refinance_ltv: f64,

    /// Months between purchase and refinance
    #[serde(default = "default_rehab_months")]
    pub rehab_months: f64,
    /// Expected vacancy (%)
    #[serde(default)]
    pub vacancy_rate: f64,
    /// Annual appreciation used for the projection (%)
    #[serde(default = "default_appreciation")]
    pub annual_appreciation: f64,
}

fn default_rehab_months() -> f64 {
    DEFAULT_REHAB_MONTHS
}

fn default_appreciation() -> f64 {
    DEFAULT_APPRECIATION
}

impl Default for BrrrrInput {
    fn default() -> Self {
        BrrrrInput {
            purchase_price: 150_000.0,
            down_payment: 30_000.0,
            rehab_cost: 25_000.0,
            closing_costs: 8_000.0,
            purchase_loan_rate: 7.5,
            purchase_loan_term: 30.0,
            after_repair_value: 220_000.0,
            monthly_rent: 1_800.0,
            monthly_expenses: 400.0,
            refinance_rate: 6.5,
            refinance_term: 30.0,
            refinance_ltv: 75.0,
            rehab_months: DEFAULT_REHAB_MONTHS,
            vacancy_rate: 0.0,
            annual_appreciation: DEFAULT_APPRECIATION,
        }
    }
}

impl BrrrrInput {
    /// Investor cash in the deal: down payment + rehab + closing costs
    pub fn total_investment(&self) -> f64 {
        self.down_payment + self.rehab_cost + self.closing_costs
    }

    pub fn purchase_loan_amount(&self) -> f64 {
        (self.purchase_price - self.down_payment).max(0.0)
    }

    /// Number of purchase-loan payments made before refinancing
    pub fn payments_before_refinance(&self) -> u32 {
        self.rehab_months.max(0.0).round() as u32
    }

    /// Purchase-loan balance at the refinance date
    pub fn balance_at_refinance(&self) -> f64 {
        remaining_balance(
            self.purchase_loan_amount(),
            Percent(self.purchase_loan_rate),
            Years(self.purchase_loan_term),
            self.payments_before_refinance(),
        )
    }

    pub fn refinance_loan_amount(&self) -> f64 {
        Percent(self.refinance_ltv).of(self.after_repair_value)
    }

    /// Rent after the vacancy allowance
    pub fn effective_monthly_rent(&self) -> f64 {
        self.monthly_rent * (1.0 - Percent(self.vacancy_rate).fraction())
    }

    pub fn refinance_monthly_payment(&self) -> f64 {
        monthly_payment(
            self.refinance_loan_amount(),
            Percent(self.refinance_rate),
            Years(self.refinance_term),
        )
    }

    /// Cash flow after refinance, before taxes
    pub fn monthly_cash_flow(&self) -> f64 {
        self.effective_monthly_rent() - self.monthly_expenses - self.refinance_monthly_payment()
    }
}

/// One year of the post-refinance projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrrrrProjectionYear {
    pub year: u32,
    pub property_value: f64,
    pub loan_balance: f64,
    pub equity: f64,
    pub cumulative_cash_flow: f64,
    /// Equity + cumulative cash flow + cash out − total investment
    pub total_return: f64,
}

/// Results of a BRRRR analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrrrrResult {
    pub total_investment: f64,
    pub purchase_loan_amount: f64,
    pub purchase_monthly_payment: f64,
    /// Purchase-loan payments made during rehab
    pub holding_costs: f64,
    pub loan_balance_at_refinance: f64,
    pub refinance_loan_amount: f64,
    pub cash_out_amount: f64,
    /// Investor cash still tied up after the refinance (negative = profit taken out)
    pub cash_left_in_deal: f64,
    /// Share of the investment returned at refinance (%)
    pub capital_recovered_percent: Option<f64>,
    pub refinance_monthly_payment: f64,
    /// Annual net operating income after vacancy and expenses
    pub net_operating_income: f64,
    pub monthly_cash_flow: f64,
    pub annual_cash_flow: f64,
    /// Annual cash flow / total investment (%)
    pub cash_on_cash_return: Option<f64>,
    pub cap_rate: Option<f64>,
    pub debt_service_coverage_ratio: Option<f64>,
    pub equity_after_refinance: f64,
    /// Months of cash flow needed to recover the cash left in the deal
    pub break_even_time: Horizon,
    /// Weighted 0-100 deal score
    pub deal_score: f64,
    pub five_year_projection: Vec<BrrrrProjectionYear>,
}

/// Presentation text for a BRRRR analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrrrrNarrative {
    pub deal_rating: String,
    pub risk_assessment: String,
    pub recommendation: String,
}

/// Validate input parameters.
pub fn validate(input: &BrrrrInput) -> ValidationResult {
    validate_typed::<BrrrrCalculator>(input)
}

/// Calculate a BRRRR deal.
///
/// # Returns
///
/// * `Ok(BrrrrResult)` - Calculation results
/// * `Err(CalcError::ValidationFailed)` - If inputs are invalid
pub fn calculate(input: &BrrrrInput) -> CalcResult<BrrrrResult> {
    calculate_typed::<BrrrrCalculator>(input)
}

/// Render the narrative for a computed result.
pub fn narrative(result: &BrrrrResult, format: &NumberFormat) -> BrrrrNarrative {
    BrrrrCalculator::narrate(result, format)
}

/// BRRRR strategy calculator.
pub struct BrrrrCalculator;

impl TypedCalculator for BrrrrCalculator {
    type Input = BrrrrInput;
    type Result = BrrrrResult;
    type Narrative = BrrrrNarrative;

    fn descriptor() -> &'static CalculatorDescriptor {
        &DESCRIPTOR
    }

    fn check_rules(input: &BrrrrInput, result: &mut ValidationResult) {
        if input.down_payment > input.purchase_price {
            result.error("downPayment", "Down payment cannot exceed the purchase price");
            return;
        }
        if input.refinance_loan_amount() <= input.balance_at_refinance() {
            result.error(
                "refinanceLTV",
                "Refinance loan amount must exceed the remaining balance on the purchase loan",
            );
        }
        if input.rehab_cost > input.purchase_price * REHAB_WARNING_RATIO {
            result.warning("rehabCost", "Rehab cost exceeds 50% of the purchase price");
        }
        if input.after_repair_value < input.purchase_price {
            result.warning(
                "afterRepairValue",
                "After-repair value is below the purchase price; the refinance may not return capital",
            );
        }
        if input.monthly_rent < (input.purchase_price + input.rehab_cost) * ONE_PERCENT_RULE {
            result.warning(
                "monthlyRent",
                "Monthly rent is below 1% of the purchase price plus rehab cost",
            );
        }
        if input.monthly_cash_flow() < 0.0 {
            result.warning("monthlyRent", "Projected cash flow after refinance is negative");
        }
    }

    fn compute(input: &BrrrrInput) -> BrrrrResult {
        let total_investment = input.total_investment();
        let purchase_loan_amount = input.purchase_loan_amount();
        let purchase_monthly_payment = monthly_payment(
            purchase_loan_amount,
            Percent(input.purchase_loan_rate),
            Years(input.purchase_loan_term),
        );
        let holding_costs = purchase_monthly_payment * input.payments_before_refinance() as f64;

        let loan_balance_at_refinance = input.balance_at_refinance();
        let refinance_loan_amount = input.refinance_loan_amount();
        let cash_out_amount = refinance_loan_amount - loan_balance_at_refinance;
        let cash_left_in_deal = total_investment - cash_out_amount;
        let capital_recovered_percent = Percent::ratio(cash_out_amount, total_investment).map(|p| p.0);

        let refinance_monthly_payment = input.refinance_monthly_payment();
        let monthly_noi = input.effective_monthly_rent() - input.monthly_expenses;
        let net_operating_income = monthly_noi * 12.0;
        let monthly_cash_flow = monthly_noi - refinance_monthly_payment;
        let annual_cash_flow = monthly_cash_flow * 12.0;

        let cash_on_cash_return = cash_on_cash(annual_cash_flow, total_investment);
        let debt_service_coverage_ratio = dscr(net_operating_income, refinance_monthly_payment * 12.0);

        let deal_score = WeightedScore::new()
            .add(linear_score(cash_on_cash_return.unwrap_or(0.0), 0.0, 15.0), 0.4)
            .add(linear_score(capital_recovered_percent.unwrap_or(0.0), 0.0, 100.0), 0.35)
            .add(
                // No debt at all counts as full coverage
                debt_service_coverage_ratio.map_or(100.0, |d| linear_score(d, 1.0, 1.5)),
                0.25,
            )
            .score();

        let five_year_projection = (1..=PROJECTION_YEARS)
            .map(|year| {
                let property_value = grow(
                    input.after_repair_value,
                    Percent(input.annual_appreciation),
                    year as f64,
                );
                let loan_balance = remaining_balance(
                    refinance_loan_amount,
                    Percent(input.refinance_rate),
                    Years(input.refinance_term),
                    year * 12,
                );
                let equity = property_value - loan_balance;
                let cumulative_cash_flow = annual_cash_flow * year as f64;
                BrrrrProjectionYear {
                    year,
                    property_value,
                    loan_balance,
                    equity,
                    cumulative_cash_flow,
                    total_return: equity + cumulative_cash_flow + cash_out_amount - total_investment,
                }
            })
            .collect();

        BrrrrResult {
            total_investment,
            purchase_loan_amount,
            purchase_monthly_payment,
            holding_costs,
            loan_balance_at_refinance,
            refinance_loan_amount,
            cash_out_amount,
            cash_left_in_deal,
            capital_recovered_percent,
            refinance_monthly_payment,
            net_operating_income,
            monthly_cash_flow,
            annual_cash_flow,
            cash_on_cash_return,
            cap_rate: cap_rate(net_operating_income, input.after_repair_value),
            debt_service_coverage_ratio,
            equity_after_refinance: input.after_repair_value - refinance_loan_amount,
            break_even_time: Horizon::from_ratio(cash_left_in_deal, monthly_cash_flow),
            deal_score,
            five_year_projection,
        }
    }

    fn narrate(result: &BrrrrResult, format: &NumberFormat) -> BrrrrNarrative {
        let deal_rating = match result.deal_score {
            s if s >= 75.0 => "Excellent",
            s if s >= 55.0 => "Good",
            s if s >= 35.0 => "Fair",
            _ => "Poor",
        }
        .to_string();

        let risk_assessment = match result.debt_service_coverage_ratio {
            _ if result.monthly_cash_flow < 0.0 => {
                "High risk: rent does not cover expenses and the refinanced debt service.".to_string()
            }
            Some(d) if d < 1.2 => format!(
                "Moderate risk: a debt service coverage ratio of {:.2} leaves little margin for vacancies or repairs.",
                d
            ),
            _ => format!(
                "Low risk: rent covers expenses and debt service with {} per month to spare.",
                format.currency(result.monthly_cash_flow)
            ),
        };

        let recovered_all = result.cash_left_in_deal <= 0.0;
        let recommendation = if recovered_all {
            format!(
                "The refinance returns all of your capital plus {}; the deal can be repeated immediately.",
                format.currency(-result.cash_left_in_deal)
            )
        } else {
            match result.break_even_time {
                Horizon::Never => format!(
                    "{} stays in the deal and cash flow never recovers it; renegotiate the price or rehab budget.",
                    format.currency(result.cash_left_in_deal)
                ),
                horizon if horizon.within(60.0) => format!(
                    "{} stays in the deal and is recovered from cash flow in {}.",
                    format.currency(result.cash_left_in_deal),
                    format.horizon_months(&horizon)
                ),
                horizon => format!(
                    "{} stays in the deal and takes {} to recover; look for a higher ARV or lower rehab cost before repeating.",
                    format.currency(result.cash_left_in_deal),
                    format.horizon_months(&horizon)
                ),
            }
        };

        BrrrrNarrative {
            deal_rating,
            risk_assessment,
            recommendation,
        }
    }
}

static DESCRIPTOR: Lazy<CalculatorDescriptor> = Lazy::new(|| {
    CalculatorDescriptor::new(ID, "BRRRR Strategy Calculator", Category::RealEstate, "investment")
        .with_description(
            "Analyze a Buy, Rehab, Rent, Refinance, Repeat deal: capital recovered at refinance, \
             cash flow and returns.",
        )
        .with_input(
            InputField::currency("purchasePrice", "Purchase Price")
                .required()
                .range(50_000.0, 10_000_000.0)
                .step(1_000.0),
        )
        .with_input(
            InputField::currency("downPayment", "Down Payment")
                .required()
                .range(0.0, 10_000_000.0)
                .step(1_000.0),
        )
        .with_input(
            InputField::currency("rehabCost", "Rehab Cost")
                .required()
                .range(0.0, 5_000_000.0)
                .step(500.0),
        )
        .with_input(
            InputField::currency("closingCosts", "Closing Costs")
                .required()
                .range(0.0, 1_000_000.0)
                .step(100.0),
        )
        .with_input(
            InputField::percentage("purchaseLoanRate", "Purchase Loan Rate")
                .required()
                .range(0.0, 20.0)
                .step(0.125),
        )
        .with_input(
            InputField::number("purchaseLoanTerm", "Purchase Loan Term (years)")
                .required()
                .range(1.0, 40.0),
        )
        .with_input(
            InputField::currency("afterRepairValue", "After-Repair Value")
                .required()
                .range(50_000.0, 20_000_000.0)
                .step(1_000.0),
        )
        .with_input(
            InputField::currency("monthlyRent", "Monthly Rent")
                .required()
                .range(0.0, 100_000.0)
                .step(50.0),
        )
        .with_input(
            InputField::currency("monthlyExpenses", "Monthly Operating Expenses")
                .required()
                .range(0.0, 100_000.0)
                .step(25.0),
        )
        .with_input(
            InputField::percentage("refinanceRate", "Refinance Rate")
                .required()
                .range(0.0, 20.0)
                .step(0.125),
        )
        .with_input(
            InputField::number("refinanceTerm", "Refinance Term (years)")
                .required()
                .range(1.0, 40.0),
        )
        .with_input(
            InputField::percentage("refinanceLTV", "Refinance LTV")
                .required()
                .range(50.0, 85.0)
                .step(1.0),
        )
        .with_input(
            InputField::number("rehabMonths", "Months Until Refinance")
                .range(0.0, 24.0)
                .default_value(DEFAULT_REHAB_MONTHS),
        )
        .with_input(
            InputField::percentage("vacancyRate", "Vacancy Rate")
                .range(0.0, 50.0)
                .default_value(0.0),
        )
        .with_input(
            InputField::percentage("annualAppreciation", "Annual Appreciation")
                .range(-10.0, 20.0)
                .default_value(DEFAULT_APPRECIATION),
        )
        .with_output(OutputField::new("totalInvestment", "Total Cash Invested", OutputKind::Currency))
        .with_output(OutputField::new("holdingCosts", "Holding Costs", OutputKind::Currency))
        .with_output(OutputField::new("loanBalanceAtRefinance", "Loan Balance at Refinance", OutputKind::Currency))
        .with_output(OutputField::new("refinanceLoanAmount", "Refinance Loan", OutputKind::Currency))
        .with_output(OutputField::new("cashOutAmount", "Cash Out at Refinance", OutputKind::Currency))
        .with_output(OutputField::new("cashLeftInDeal", "Cash Left in Deal", OutputKind::Currency))
        .with_output(OutputField::new("capitalRecoveredPercent", "Capital Recovered", OutputKind::Percentage))
        .with_output(OutputField::new("refinanceMonthlyPayment", "Refinance Payment", OutputKind::Currency))
        .with_output(OutputField::new("netOperatingIncome", "Net Operating Income", OutputKind::Currency))
        .with_output(OutputField::new("monthlyCashFlow", "Monthly Cash Flow", OutputKind::Currency))
        .with_output(OutputField::new("annualCashFlow", "Annual Cash Flow", OutputKind::Currency))
        .with_output(OutputField::new("cashOnCashReturn", "Cash-on-Cash Return", OutputKind::Percentage))
        .with_output(OutputField::new("capRate", "Cap Rate", OutputKind::Percentage))
        .with_output(OutputField::new("debtServiceCoverageRatio", "DSCR", OutputKind::Number))
        .with_output(OutputField::new("equityAfterRefinance", "Equity after Refinance", OutputKind::Currency))
        .with_output(OutputField::new("breakEvenTime", "Break-even", OutputKind::Horizon))
        .with_output(OutputField::new("dealScore", "Deal Score", OutputKind::Number))
        .with_output(OutputField::new("fiveYearProjection", "Five-Year Projection", OutputKind::Table))
        .with_output(OutputField::new("dealRating", "Deal Rating", OutputKind::Text))
        .with_output(OutputField::new("riskAssessment", "Risk Assessment", OutputKind::Text))
        .with_output(OutputField::new("recommendation", "Recommendation", OutputKind::Text))
        .with_example(Example::new(
            "Single-family BRRRR",
            "A $150k purchase with $25k of rehab refinanced at 75% of a $220k ARV.",
            InputRecord::from_typed(&BrrrrInput::default()).unwrap_or_default(),
        ))
        .with_example(Example::new(
            "Full capital recovery",
            "Deep discount purchase where the refinance returns all invested cash.",
            InputRecord::new()
                .with("purchasePrice", 90_000.0)
                .with("downPayment", 18_000.0)
                .with("rehabCost", 30_000.0)
                .with("closingCosts", 4_000.0)
                .with("purchaseLoanRate", 9.0)
                .with("purchaseLoanTerm", 30.0)
                .with("afterRepairValue", 200_000.0)
                .with("monthlyRent", 1_900.0)
                .with("monthlyExpenses", 450.0)
                .with("refinanceRate", 6.75)
                .with("refinanceTerm", 30.0)
                .with("refinanceLTV", 75.0)
                .with("vacancyRate", 5.0),
        ))
});

#[cfg(test)]
mod tests {
    use super::*;

    fn test_input() -> BrrrrInput {
        BrrrrInput::default()
    }

    #[test]
    fn test_total_investment_scenario() {
        let result = calculate(&test_input()).unwrap();
        // 30,000 + 25,000 + 8,000
        assert_eq!(result.total_investment, 63_000.0);
    }

    #[test]
    fn test_cash_on_cash_consistent_with_cash_flow() {
        let result = calculate(&test_input()).unwrap();
        let expected = result.annual_cash_flow / result.total_investment * 100.0;
        assert!((result.cash_on_cash_return.unwrap() - expected).abs() < 1e-9);

        // Independent check: rent 1800 - expenses 400 - refinance payment on 165,000 at 6.5%
        let refinance_payment = monthly_payment(165_000.0, Percent(6.5), Years(30.0));
        let annual = (1_800.0 - 400.0 - refinance_payment) * 12.0;
        assert!((result.annual_cash_flow - annual).abs() < 1e-6);
    }

    #[test]
    fn test_refinance_figures() {
        let result = calculate(&test_input()).unwrap();
        assert!((result.refinance_loan_amount - 165_000.0).abs() < 1e-9);
        // Six payments on 120,000 at 7.5% barely touch the principal
        assert!(result.loan_balance_at_refinance < 120_000.0);
        assert!(result.loan_balance_at_refinance > 119_000.0);
        assert!((result.cash_out_amount - (165_000.0 - result.loan_balance_at_refinance)).abs() < 1e-9);
        assert!((result.equity_after_refinance - 55_000.0).abs() < 1e-9);
        assert!((result.refinance_monthly_payment - 1042.91).abs() < 0.01);
    }

    #[test]
    fn test_break_even_uses_cash_left() {
        let result = calculate(&test_input()).unwrap();
        let months = result.break_even_time.periods().unwrap();
        assert!((months - result.cash_left_in_deal / result.monthly_cash_flow).abs() < 1e-9);
    }

    #[test]
    fn test_rehab_cost_monotonicity() {
        let mut previous = calculate(&test_input()).unwrap();
        for rehab in [30_000.0, 40_000.0, 60_000.0, 90_000.0] {
            let mut input = test_input();
            input.rehab_cost = rehab;
            let current = calculate(&input).unwrap();
            assert!(current.total_investment > previous.total_investment);
            assert_ne!(
                current.break_even_time.compare(&previous.break_even_time),
                std::cmp::Ordering::Less
            );
            previous = current;
        }
    }

    #[test]
    fn test_down_payment_exceeds_price() {
        let mut input = test_input();
        input.down_payment = 160_000.0;
        let validation = validate(&input);
        assert!(!validation.is_valid);
        assert!(validation.has_error_for("downPayment"));
    }

    #[test]
    fn test_refinance_must_exceed_balance() {
        let mut input = test_input();
        input.down_payment = 0.0;
        input.after_repair_value = 150_000.0;
        input.refinance_ltv = 50.0;
        let validation = validate(&input);
        assert!(validation.has_error_for("refinanceLTV"));
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn test_high_rehab_is_warning_only() {
        let mut input = test_input();
        input.rehab_cost = 80_000.0;
        input.monthly_rent = 2_400.0;
        let validation = validate(&input);
        assert!(validation.is_valid);
        assert!(validation.has_warning_for("rehabCost"));
    }

    #[test]
    fn test_negative_cash_flow_never_breaks_even() {
        let mut input = test_input();
        input.monthly_rent = 1_000.0;
        let validation = validate(&input);
        assert!(validation.is_valid);
        assert!(validation.has_warning_for("monthlyRent"));
        let result = calculate(&input).unwrap();
        assert!(result.monthly_cash_flow < 0.0);
        assert_eq!(result.break_even_time, Horizon::Never);
        let text = narrative(&result, &NumberFormat::default());
        assert!(text.risk_assessment.starts_with("High risk"));
        assert!(text.recommendation.contains("never recovers"));
    }

    #[test]
    fn test_full_capital_recovery() {
        let mut input = test_input();
        input.after_repair_value = 280_000.0;
        let result = calculate(&input).unwrap();
        assert!(result.cash_left_in_deal < 0.0);
        assert_eq!(result.break_even_time, Horizon::Converges(0.0));
        assert!(result.capital_recovered_percent.unwrap() > 100.0);
        let text = narrative(&result, &NumberFormat::default());
        assert!(text.recommendation.contains("returns all of your capital"));
    }

    #[test]
    fn test_projection() {
        let result = calculate(&test_input()).unwrap();
        assert_eq!(result.five_year_projection.len(), 5);
        let first = &result.five_year_projection[0];
        let last = &result.five_year_projection[4];
        assert!((first.property_value - 226_600.0).abs() < 1e-6);
        assert!(last.loan_balance < first.loan_balance);
        assert!(last.equity > first.equity);
    }

    #[test]
    fn test_idempotent() {
        let input = test_input();
        assert_eq!(calculate(&input).unwrap(), calculate(&input).unwrap());
    }

    #[test]
    fn test_ltv_serializes_with_acronym() {
        let json = serde_json::to_string(&test_input()).unwrap();
        assert!(json.contains("\"refinanceLTV\":75.0"));
        assert!(json.contains("\"afterRepairValue\":220000.0"));
    }
}
