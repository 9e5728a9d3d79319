//! # Triple Net Lease ROI
//!
//! Returns on a single-tenant net-leased (NNN) property. Under a triple net
//! lease the tenant pays property taxes, insurance and maintenance, so the
//! landlord's operating income is the base rent less any reserves the
//! landlord keeps and a vacancy allowance.
//!
//! ## Lease Projection
//!
//! Rent escalates annually by `annualRentEscalation`. Debt service is paid
//! until the loan matures; equity from paydown is the principal repaid by
//! the end of the lease. Appreciation is not modelled.
//!
//! ```text
//! total return      = Σ annual cash flow + equity from paydown
//! annualized return = ((cash invested + total return) / cash invested)^(1/years) − 1
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::finance::{
    cap_rate, cash_on_cash, dscr, grow, linear_score, monthly_payment, ratio, remaining_balance,
    Horizon, WeightedScore,
};
use crate::format::NumberFormat;
use crate::record::InputRecord;
use crate::schema::{CalculatorDescriptor, Category, Example, InputField, OutputField, OutputKind};
use crate::units::{Percent, Years};
use crate::validation::ValidationResult;

use super::{calculate_typed, validate_typed, TypedCalculator};

/// Calculator id
pub const ID: &str = "triple-net-lease";

const DEFAULT_LOAN_TERM: f64 = 20.0;
const DEFAULT_ESCALATION: f64 = 2.0;

/// Local tenants on leases longer than this are flagged
const LOCAL_TENANT_LEASE_YEARS: f64 = 10.0;

/// Tenant credit quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TenantCreditRating {
    /// Rated BBB- or better
    InvestmentGrade,
    #[default]
    National,
    Regional,
    Local,
}

impl TenantCreditRating {
    /// Baseline tenant risk (0-100, higher is riskier)
    pub fn base_risk(&self) -> f64 {
        match self {
            TenantCreditRating::InvestmentGrade => 15.0,
            TenantCreditRating::National => 35.0,
            TenantCreditRating::Regional => 60.0,
            TenantCreditRating::Local => 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripleNetLeaseInput {
    pub purchase_price: f64,
    pub down_payment_percent: f64,
    pub interest_rate: f64,
    #[serde(default = "default_loan_term")]
    pub loan_term: f64,
    #[serde(default)]
    pub closing_costs: f64,

    /// First-year base rent
    pub annual_base_rent: f64,
    /// Annual rent increase (%)
    #[serde(default = "default_escalation")]
    pub annual_rent_escalation: f64,
    pub lease_term_years: f64,
    #[serde(default)]
    pub tenant_credit_rating: TenantCreditRating,

    /// Landlord-paid reserves per year (roof, structure)
    #[serde(default)]
    pub landlord_reserves: f64,
    /// Vacancy allowance (%)
    #[serde(default)]
    pub vacancy_allowance: f64,
}

fn default_loan_term() -> f64 {
    DEFAULT_LOAN_TERM
}

fn default_escalation() -> f64 {
    DEFAULT_ESCALATION
}

impl Default for TripleNetLeaseInput {
    fn default() -> Self {
        TripleNetLeaseInput {
            purchase_price: 2_000_000.0,
            down_payment_percent: 35.0,
            interest_rate: 6.0,
            loan_term: DEFAULT_LOAN_TERM,
            closing_costs: 40_000.0,
            annual_base_rent: 130_000.0,
            annual_rent_escalation: DEFAULT_ESCALATION,
            lease_term_years: 20.0,
            tenant_credit_rating: TenantCreditRating::National,
            landlord_reserves: 0.0,
            vacancy_allowance: 0.0,
        }
    }
}

impl TripleNetLeaseInput {
    pub fn down_payment(&self) -> f64 {
        Percent(self.down_payment_percent).of(self.purchase_price)
    }

    pub fn loan_amount(&self) -> f64 {
        (self.purchase_price - self.down_payment()).max(0.0)
    }

    pub fn annual_debt_service(&self) -> f64 {
        monthly_payment(self.loan_amount(), Percent(self.interest_rate), Years(self.loan_term)) * 12.0
    }

    /// NOI for a given year's rent
    pub fn net_operating_income(&self, annual_rent: f64) -> f64 {
        annual_rent * (1.0 - Percent(self.vacancy_allowance).fraction()) - self.landlord_reserves
    }

    /// Whole lease years used for the projection
    pub fn lease_years(&self) -> u32 {
        self.lease_term_years.round().max(1.0) as u32
    }
}

/// One year of the lease projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseYear {
    pub year: u32,
    pub annual_rent: f64,
    pub net_operating_income: f64,
    pub debt_service: f64,
    pub cash_flow: f64,
    pub cumulative_cash_flow: f64,
    pub loan_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripleNetLeaseResult {
    pub loan_amount: f64,
    pub annual_debt_service: f64,
    /// First-year NOI
    pub net_operating_income: f64,
    pub cap_rate: Option<f64>,
    pub total_cash_invested: f64,
    /// First-year cash flow
    pub annual_cash_flow: f64,
    pub cash_on_cash_return: Option<f64>,
    pub debt_service_coverage_ratio: Option<f64>,
    pub total_rent_over_lease: f64,
    pub lease_projection: Vec<LeaseYear>,
    pub total_cash_flow_over_lease: f64,
    pub equity_from_paydown: f64,
    pub total_return: f64,
    /// Compound annual return over the lease (%)
    pub annualized_return: Option<f64>,
    /// Years of cash flow needed to recover the cash invested
    pub payback_period: Horizon,
    /// 0-100, higher is riskier
    pub tenant_risk_score: f64,
    /// 0-100 composite of yield, leverage and tenant quality
    pub investment_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripleNetLeaseNarrative {
    pub investment_rating: String,
    pub risk_assessment: String,
}

pub fn validate(input: &TripleNetLeaseInput) -> ValidationResult {
    validate_typed::<TripleNetLeaseCalculator>(input)
}

pub fn calculate(input: &TripleNetLeaseInput) -> CalcResult<TripleNetLeaseResult> {
    calculate_typed::<TripleNetLeaseCalculator>(input)
}

pub fn narrative(result: &TripleNetLeaseResult, format: &NumberFormat) -> TripleNetLeaseNarrative {
    TripleNetLeaseCalculator::narrate(result, format)
}

fn project_lease(input: &TripleNetLeaseInput) -> Vec<LeaseYear> {
    let loan = input.loan_amount();
    let debt_service = input.annual_debt_service();
    let loan_years = input.loan_term.round().max(0.0) as u32;

    let mut cumulative_cash_flow = 0.0;
    (1..=input.lease_years())
        .map(|year| {
            let annual_rent = grow(
                input.annual_base_rent,
                Percent(input.annual_rent_escalation),
                (year - 1) as f64,
            );
            let net_operating_income = input.net_operating_income(annual_rent);
            let debt_service = if year <= loan_years { debt_service } else { 0.0 };
            let cash_flow = net_operating_income - debt_service;
            cumulative_cash_flow += cash_flow;
            LeaseYear {
                year,
                annual_rent,
                net_operating_income,
                debt_service,
                cash_flow,
                cumulative_cash_flow,
                loan_balance: remaining_balance(
                    loan,
                    Percent(input.interest_rate),
                    Years(input.loan_term),
                    year * 12,
                ),
            }
        })
        .collect()
}

/// Interpolated year in which cumulative cash flow recovers `invested`.
/// Beyond the lease, the final year's cash flow is assumed to continue.
fn payback_period(invested: f64, projection: &[LeaseYear]) -> Horizon {
    if invested <= 0.0 {
        return Horizon::Converges(0.0);
    }
    let mut recovered = 0.0;
    for (i, year) in projection.iter().enumerate() {
        if year.cash_flow > 0.0 && recovered + year.cash_flow >= invested {
            return Horizon::Converges(i as f64 + (invested - recovered) / year.cash_flow);
        }
        recovered += year.cash_flow;
    }
    let last_cash_flow = projection.last().map_or(0.0, |y| y.cash_flow);
    match Horizon::from_ratio(invested - recovered, last_cash_flow) {
        Horizon::Converges(extra) => Horizon::Converges(projection.len() as f64 + extra),
        Horizon::Never => Horizon::Never,
    }
}

pub struct TripleNetLeaseCalculator;

impl TypedCalculator for TripleNetLeaseCalculator {
    type Input = TripleNetLeaseInput;
    type Result = TripleNetLeaseResult;
    type Narrative = TripleNetLeaseNarrative;

    fn descriptor() -> &'static CalculatorDescriptor {
        &DESCRIPTOR
    }

    fn check_rules(input: &TripleNetLeaseInput, result: &mut ValidationResult) {
        let noi = input.net_operating_income(input.annual_base_rent);
        if let Some(coverage) = dscr(noi, input.annual_debt_service()) {
            if coverage < 1.0 {
                result.warning(
                    "annualBaseRent",
                    format!(
                        "Rent does not cover debt service (DSCR {:.2}); the property will need cash from you",
                        coverage
                    ),
                );
            }
        }
        if input.loan_amount() > 0.0 && input.lease_term_years < input.loan_term {
            result.warning(
                "leaseTermYears",
                "Lease ends before the loan matures; plan for re-leasing or refinancing risk",
            );
        }
        if input.tenant_credit_rating == TenantCreditRating::Local
            && input.lease_term_years > LOCAL_TENANT_LEASE_YEARS
        {
            result.warning(
                "tenantCreditRating",
                "A long lease with a local tenant carries significant default risk",
            );
        }
    }

    fn compute(input: &TripleNetLeaseInput) -> TripleNetLeaseResult {
        let loan_amount = input.loan_amount();
        let annual_debt_service = input.annual_debt_service();
        let net_operating_income = input.net_operating_income(input.annual_base_rent);
        let total_cash_invested = input.down_payment() + input.closing_costs;
        let annual_cash_flow = net_operating_income - annual_debt_service;

        let lease_projection = project_lease(input);
        let total_rent_over_lease = lease_projection.iter().map(|y| y.annual_rent).sum();
        let total_cash_flow_over_lease: f64 = lease_projection.iter().map(|y| y.cash_flow).sum();
        let ending_balance = lease_projection.last().map_or(loan_amount, |y| y.loan_balance);
        let equity_from_paydown = loan_amount - ending_balance;
        let total_return = total_cash_flow_over_lease + equity_from_paydown;

        let years = lease_projection.len() as f64;
        let annualized_return = ratio(total_cash_invested + total_return, total_cash_invested)
            .filter(|_| total_cash_invested > 0.0)
            .map(|multiple| {
                if multiple <= 0.0 {
                    -100.0
                } else {
                    (multiple.powf(1.0 / years) - 1.0) * 100.0
                }
            });

        let cap = cap_rate(net_operating_income, input.purchase_price);
        let cash_on_cash_return = cash_on_cash(annual_cash_flow, total_cash_invested);
        let coverage = dscr(net_operating_income, annual_debt_service);

        let tenant_risk_score = WeightedScore::new()
            .add(input.tenant_credit_rating.base_risk(), 0.6)
            .add(linear_score(input.lease_term_years, 20.0, 2.0), 0.25)
            .add(coverage.map_or(0.0, |d| linear_score(d, 1.6, 1.0)), 0.15)
            .score();

        let investment_score = WeightedScore::new()
            .add(linear_score(cap.unwrap_or(0.0), 4.0, 9.0), 0.35)
            .add(linear_score(annualized_return.unwrap_or(0.0), 0.0, 12.0), 0.35)
            .add(100.0 - tenant_risk_score, 0.3)
            .score();

        TripleNetLeaseResult {
            loan_amount,
            annual_debt_service,
            net_operating_income,
            cap_rate: cap,
            total_cash_invested,
            annual_cash_flow,
            cash_on_cash_return,
            debt_service_coverage_ratio: coverage,
            total_rent_over_lease,
            payback_period: payback_period(total_cash_invested, &lease_projection),
            lease_projection,
            total_cash_flow_over_lease,
            equity_from_paydown,
            total_return,
            annualized_return,
            tenant_risk_score,
            investment_score,
        }
    }

    fn narrate(result: &TripleNetLeaseResult, format: &NumberFormat) -> TripleNetLeaseNarrative {
        let investment_rating = match result.investment_score {
            s if s >= 75.0 => "Excellent",
            s if s >= 60.0 => "Good",
            s if s >= 45.0 => "Fair",
            _ => "Poor",
        }
        .to_string();

        let tenant = match result.tenant_risk_score {
            s if s >= 60.0 => "Tenant risk is high; underwrite the re-leasing cost carefully",
            s if s >= 35.0 => "Tenant risk is moderate",
            _ => "Tenant risk is low",
        };
        let cash_flow = if result.annual_cash_flow < 0.0 {
            format!(
                "the property runs a first-year shortfall of {}",
                format.currency(-result.annual_cash_flow)
            )
        } else {
            format!(
                "first-year cash flow is {} and the investment pays back in {}",
                format.currency(result.annual_cash_flow),
                format.horizon_years(&result.payback_period)
            )
        };

        TripleNetLeaseNarrative {
            investment_rating,
            risk_assessment: format!("{}; {}.", tenant, cash_flow),
        }
    }
}

static DESCRIPTOR: Lazy<CalculatorDescriptor> = Lazy::new(|| {
    CalculatorDescriptor::new(ID, "Triple Net Lease ROI", Category::RealEstate, "commercial")
        .with_description(
            "Cash flow, returns and tenant risk for a property leased on triple net terms.",
        )
        .with_input(
            InputField::currency("purchasePrice", "Purchase Price")
                .required()
                .range(100_000.0, 100_000_000.0)
                .step(10_000.0),
        )
        .with_input(
            InputField::percentage("downPaymentPercent", "Down Payment")
                .required()
                .range(0.0, 100.0)
                .step(1.0),
        )
        .with_input(
            InputField::percentage("interestRate", "Interest Rate")
                .required()
                .range(0.0, 20.0)
                .step(0.125),
        )
        .with_input(
            InputField::number("loanTerm", "Loan Term (years)")
                .range(5.0, 30.0)
                .default_value(DEFAULT_LOAN_TERM),
        )
        .with_input(
            InputField::currency("closingCosts", "Closing Costs")
                .range(0.0, 5_000_000.0)
                .default_value(0.0),
        )
        .with_input(
            InputField::currency("annualBaseRent", "Annual Base Rent")
                .required()
                .range(10_000.0, 20_000_000.0)
                .step(1_000.0),
        )
        .with_input(
            InputField::percentage("annualRentEscalation", "Annual Rent Escalation")
                .range(0.0, 10.0)
                .step(0.25)
                .default_value(DEFAULT_ESCALATION),
        )
        .with_input(
            InputField::number("leaseTermYears", "Lease Term (years)")
                .required()
                .range(1.0, 50.0),
        )
        .with_input(
            InputField::select(
                "tenantCreditRating",
                "Tenant Credit",
                &[
                    ("investment-grade", "Investment grade"),
                    ("national", "National"),
                    ("regional", "Regional"),
                    ("local", "Local"),
                ],
            )
            .default_value("national"),
        )
        .with_input(
            InputField::currency("landlordReserves", "Landlord Reserves (annual)")
                .range(0.0, 1_000_000.0)
                .default_value(0.0),
        )
        .with_input(
            InputField::percentage("vacancyAllowance", "Vacancy Allowance")
                .range(0.0, 25.0)
                .default_value(0.0),
        )
        .with_output(OutputField::new("loanAmount", "Loan Amount", OutputKind::Currency))
        .with_output(OutputField::new("annualDebtService", "Annual Debt Service", OutputKind::Currency))
        .with_output(OutputField::new("netOperatingIncome", "Net Operating Income", OutputKind::Currency))
        .with_output(OutputField::new("capRate", "Cap Rate", OutputKind::Percentage))
        .with_output(OutputField::new("totalCashInvested", "Total Cash Invested", OutputKind::Currency))
        .with_output(OutputField::new("annualCashFlow", "Annual Cash Flow", OutputKind::Currency))
        .with_output(OutputField::new("cashOnCashReturn", "Cash-on-Cash Return", OutputKind::Percentage))
        .with_output(OutputField::new("debtServiceCoverageRatio", "DSCR", OutputKind::Number))
        .with_output(OutputField::new("totalRentOverLease", "Total Rent over Lease", OutputKind::Currency))
        .with_output(OutputField::new("leaseProjection", "Lease Projection", OutputKind::Table))
        .with_output(OutputField::new("totalCashFlowOverLease", "Total Cash Flow", OutputKind::Currency))
        .with_output(OutputField::new("equityFromPaydown", "Equity from Paydown", OutputKind::Currency))
        .with_output(OutputField::new("totalReturn", "Total Return", OutputKind::Currency))
        .with_output(OutputField::new("annualizedReturn", "Annualized Return", OutputKind::Percentage))
        .with_output(OutputField::new("paybackPeriod", "Payback Period", OutputKind::Horizon))
        .with_output(OutputField::new("tenantRiskScore", "Tenant Risk Score", OutputKind::Number))
        .with_output(OutputField::new("investmentScore", "Investment Score", OutputKind::Number))
        .with_output(OutputField::new("investmentRating", "Investment Rating", OutputKind::Text))
        .with_output(OutputField::new("riskAssessment", "Risk Assessment", OutputKind::Text))
        .with_example(Example::new(
            "National retail tenant",
            "A $2M single-tenant building on a 20-year lease with 2% escalations.",
            InputRecord::from_typed(&TripleNetLeaseInput::default()).unwrap_or_default(),
        ))
        .with_example(Example::new(
            "All-cash pharmacy",
            "Investment-grade tenant purchased without financing.",
            InputRecord::new()
                .with("purchasePrice", 5_500_000.0)
                .with("downPaymentPercent", 100.0)
                .with("interestRate", 0.0)
                .with("annualBaseRent", 330_000.0)
                .with("annualRentEscalation", 1.0)
                .with("leaseTermYears", 25.0)
                .with("tenantCreditRating", "investment-grade"),
        ))
});
