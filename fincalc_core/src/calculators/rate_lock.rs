//! # Rate Lock Analysis
//!
//! Compares locking today's mortgage rate against floating until closing.
//!
//! The float scenario assumes the rate moves by `expectedRateChange`
//! percentage points before closing. Locking costs an up-front fee that
//! depends on the lock period, plus per-day extension fees when closing
//! falls after the lock expires.
//!
//! ## Lock Fee Schedule
//!
//! | Lock period | Fee (% of loan) |
//! |-------------|-----------------|
//! | ≤ 30 days   | 0               |
//! | ≤ 45 days   | 0.125           |
//! | ≤ 60 days   | 0.25            |
//! | ≤ 90 days   | 0.375           |
//! | longer      | 0.5             |

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::finance::{linear_score, monthly_payment, Horizon, WeightedScore};
use crate::format::NumberFormat;
use crate::record::InputRecord;
use crate::schema::{CalculatorDescriptor, Category, Example, InputField, OutputField, OutputKind};
use crate::units::{Months, Percent, Years};
use crate::validation::ValidationResult;

use super::{calculate_typed, validate_typed, TypedCalculator};

/// Calculator id
pub const ID: &str = "rate-lock";

const DEFAULT_LOAN_TERM: f64 = 30.0;
const DEFAULT_EXTENSION_FEE_PER_DAY: f64 = 0.01;

/// `(max lock days, fee %)`, shortest period first
const LOCK_FEE_TABLE: [(f64, f64); 4] = [(30.0, 0.0), (45.0, 0.125), (60.0, 0.25), (90.0, 0.375)];
const LONG_LOCK_FEE: f64 = 0.5;

/// Expected moves larger than this (points) are flagged as speculative
const LARGE_RATE_MOVE: f64 = 1.5;

/// Look up the lock fee (% of loan) for a lock period
pub fn lock_fee_for_period(lock_days: f64) -> f64 {
    LOCK_FEE_TABLE
        .iter()
        .find(|(max_days, _)| lock_days <= *max_days)
        .map(|(_, fee)| *fee)
        .unwrap_or(LONG_LOCK_FEE)
}

/// Market volatility as judged by the borrower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketVolatility {
    Low,
    #[default]
    Moderate,
    High,
}

impl MarketVolatility {
    /// Risk sub-score contributed by volatility
    fn risk(self) -> f64 {
        match self {
            MarketVolatility::Low => 20.0,
            MarketVolatility::Moderate => 50.0,
            MarketVolatility::High => 85.0,
        }
    }
}

/// Input parameters for a lock-versus-float decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLockInput {
    pub loan_amount: f64,

    /// Rate offered today (%)
    pub current_rate: f64,

    /// Loan term (years)
    #[serde(default = "default_loan_term")]
    pub loan_term: f64,

    pub lock_period_days: f64,
    pub days_to_closing: f64,

    /// Expected rate move before closing, in percentage points
    #[serde(default)]
    pub expected_rate_change: f64,

    #[serde(default)]
    pub market_volatility: MarketVolatility,

    /// Explicit lock fee (% of loan); looked up from the lock period when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_fee_percent: Option<f64>,

    /// Extension fee per day past the lock (% of loan)
    #[serde(default = "default_extension_fee")]
    pub extension_fee_per_day: f64,
}

fn default_loan_term() -> f64 {
    DEFAULT_LOAN_TERM
}

fn default_extension_fee() -> f64 {
    DEFAULT_EXTENSION_FEE_PER_DAY
}

impl Default for RateLockInput {
    fn default() -> Self {
        RateLockInput {
            loan_amount: 400_000.0,
            current_rate: 6.5,
            loan_term: DEFAULT_LOAN_TERM,
            lock_period_days: 45.0,
            days_to_closing: 40.0,
            expected_rate_change: 0.5,
            market_volatility: MarketVolatility::Moderate,
            lock_fee_percent: None,
            extension_fee_per_day: DEFAULT_EXTENSION_FEE_PER_DAY,
        }
    }
}

impl RateLockInput {
    /// Rate expected at closing if the borrower floats
    pub fn float_rate(&self) -> f64 {
        self.current_rate + self.expected_rate_change
    }

    /// Days between lock expiry and closing (0 when the lock covers closing)
    pub fn coverage_gap_days(&self) -> f64 {
        (self.days_to_closing - self.lock_period_days).max(0.0)
    }

    pub fn effective_lock_fee_percent(&self) -> f64 {
        self.lock_fee_percent
            .unwrap_or_else(|| lock_fee_for_period(self.lock_period_days))
    }
}

/// Lock decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LockDecision {
    LockNow,
    Float,
    LockWithFloatDown,
}

/// Results of a rate lock analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLockResult {
    pub lock_fee_percent: f64,
    pub lock_fee: f64,
    pub float_rate: f64,
    pub monthly_payment_locked: f64,
    pub monthly_payment_floating: f64,
    /// Floating payment minus locked payment (positive when locking saves)
    pub monthly_difference: f64,
    pub lifetime_difference: f64,
    pub coverage_gap_days: f64,
    pub extension_cost: f64,
    pub total_lock_cost: f64,
    /// Months of payment savings needed to recover the lock cost
    pub break_even_months: Horizon,
    pub rate_risk_score: f64,
    pub decision: LockDecision,
}

/// Presentation text for a rate lock analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLockNarrative {
    pub risk_level: String,
    pub summary: String,
    pub recommendation: String,
}

pub fn validate(input: &RateLockInput) -> ValidationResult {
    validate_typed::<RateLockCalculator>(input)
}

pub fn calculate(input: &RateLockInput) -> CalcResult<RateLockResult> {
    calculate_typed::<RateLockCalculator>(input)
}

pub fn narrative(result: &RateLockResult, format: &NumberFormat) -> RateLockNarrative {
    RateLockCalculator::narrate(result, format)
}

/// Rate lock calculator.
pub struct RateLockCalculator;

impl TypedCalculator for RateLockCalculator {
    type Input = RateLockInput;
    type Result = RateLockResult;
    type Narrative = RateLockNarrative;

    fn descriptor() -> &'static CalculatorDescriptor {
        &DESCRIPTOR
    }

    fn check_rules(input: &RateLockInput, result: &mut ValidationResult) {
        if input.float_rate() <= 0.0 {
            result.error(
                "expectedRateChange",
                "Expected rate change would push the rate to zero or below",
            );
        }
        let gap = input.coverage_gap_days();
        if gap > 0.0 {
            result.warning(
                "lockPeriodDays",
                format!(
                    "Lock expires {} days before closing; extension fees will apply",
                    gap.round()
                ),
            );
        }
        if input.expected_rate_change.abs() > LARGE_RATE_MOVE {
            result.warning(
                "expectedRateChange",
                "Rate moves above 1.5 points before closing are unusual; treat the float scenario with caution",
            );
        }
    }

    fn compute(input: &RateLockInput) -> RateLockResult {
        let term = Years(input.loan_term);
        let lock_fee_percent = input.effective_lock_fee_percent();
        let lock_fee = Percent(lock_fee_percent).of(input.loan_amount);
        let float_rate = input.float_rate();

        let monthly_payment_locked =
            monthly_payment(input.loan_amount, Percent(input.current_rate), term);
        let monthly_payment_floating = monthly_payment(input.loan_amount, Percent(float_rate), term);
        let monthly_difference = monthly_payment_floating - monthly_payment_locked;
        let lifetime_difference = monthly_difference * Months::from(term).0;

        let coverage_gap_days = input.coverage_gap_days();
        let extension_cost =
            Percent(input.extension_fee_per_day).of(input.loan_amount) * coverage_gap_days;
        let total_lock_cost = lock_fee + extension_cost;

        let rate_risk_score = WeightedScore::new()
            .add(input.market_volatility.risk(), 0.4)
            .add(linear_score(input.expected_rate_change, -1.0, 1.0), 0.35)
            .add(linear_score(input.days_to_closing, 0.0, 90.0), 0.25)
            .score();

        let decision = if input.expected_rate_change > 0.0 || rate_risk_score >= 70.0 {
            LockDecision::LockNow
        } else if input.expected_rate_change <= -0.25 {
            LockDecision::Float
        } else {
            LockDecision::LockWithFloatDown
        };

        RateLockResult {
            lock_fee_percent,
            lock_fee,
            float_rate,
            monthly_payment_locked,
            monthly_payment_floating,
            monthly_difference,
            lifetime_difference,
            coverage_gap_days,
            extension_cost,
            total_lock_cost,
            break_even_months: Horizon::from_ratio(total_lock_cost, monthly_difference),
            rate_risk_score,
            decision,
        }
    }

    fn narrate(result: &RateLockResult, format: &NumberFormat) -> RateLockNarrative {
        let risk_level = match result.rate_risk_score {
            s if s >= 70.0 => "High",
            s if s >= 40.0 => "Moderate",
            _ => "Low",
        }
        .to_string();

        let summary = if result.monthly_difference == 0.0 {
            format!(
                "Locking costs {}; the rate is expected to hold at {}.",
                format.currency(result.total_lock_cost),
                format.percent(result.float_rate)
            )
        } else if result.monthly_difference > 0.0 {
            format!(
                "Locking costs {} and avoids {} per month if the rate reaches {}.",
                format.currency(result.total_lock_cost),
                format.currency(result.monthly_difference),
                format.percent(result.float_rate)
            )
        } else {
            format!(
                "Locking costs {}; floating would save {} per month if the rate falls to {}.",
                format.currency(result.total_lock_cost),
                format.currency(-result.monthly_difference),
                format.percent(result.float_rate)
            )
        };

        let recommendation = match result.decision {
            LockDecision::LockNow => match result.break_even_months {
                Horizon::Converges(_) => format!(
                    "Lock now: the lock pays for itself in {}.",
                    format.horizon_months(&result.break_even_months)
                ),
                // Chosen on risk alone; no payment saving to recover the cost
                Horizon::Never => format!(
                    "Lock now: rate risk is {}; the lock cost is insurance against a rise rather than a saving.",
                    risk_level.to_lowercase()
                ),
            },
            LockDecision::Float => {
                "Float: rates are expected to fall, but watch the market closely until closing."
                    .to_string()
            }
            LockDecision::LockWithFloatDown => {
                "Lock with a float-down option to protect against increases while keeping room for a drop."
                    .to_string()
            }
        };

        RateLockNarrative {
            risk_level,
            summary,
            recommendation,
        }
    }
}

static DESCRIPTOR: Lazy<CalculatorDescriptor> = Lazy::new(|| {
    CalculatorDescriptor::new(ID, "Rate Lock Analysis", Category::Finance, "mortgage")
        .with_description("Decide whether to lock a mortgage rate now or float until closing.")
        .with_input(
            InputField::currency("loanAmount", "Loan Amount")
                .required()
                .range(10_000.0, 10_000_000.0)
                .step(1_000.0),
        )
        .with_input(
            InputField::percentage("currentRate", "Current Rate")
                .required()
                .range(0.5, 20.0)
                .step(0.125),
        )
        .with_input(
            InputField::number("loanTerm", "Loan Term (years)")
                .range(5.0, 40.0)
                .default_value(DEFAULT_LOAN_TERM),
        )
        .with_input(
            InputField::number("lockPeriodDays", "Lock Period (days)")
                .required()
                .range(15.0, 120.0)
                .step(15.0),
        )
        .with_input(
            InputField::number("daysToClosing", "Days to Closing")
                .required()
                .range(1.0, 180.0),
        )
        .with_input(
            InputField::percentage("expectedRateChange", "Expected Rate Change")
                .range(-3.0, 3.0)
                .step(0.125)
                .default_value(0.0)
                .help("Percentage points; positive if rates are expected to rise"),
        )
        .with_input(
            InputField::select(
                "marketVolatility",
                "Market Volatility",
                &[("low", "Low"), ("moderate", "Moderate"), ("high", "High")],
            )
            .default_value("moderate"),
        )
        .with_input(
            InputField::percentage("lockFeePercent", "Lock Fee")
                .range(0.0, 2.0)
                .step(0.125)
                .help("Leave blank to use the standard fee for the lock period"),
        )
        .with_input(
            InputField::percentage("extensionFeePerDay", "Extension Fee per Day")
                .range(0.0, 0.1)
                .default_value(DEFAULT_EXTENSION_FEE_PER_DAY),
        )
        .with_output(OutputField::new("lockFeePercent", "Lock Fee %", OutputKind::Percentage))
        .with_output(OutputField::new("lockFee", "Lock Fee", OutputKind::Currency))
        .with_output(OutputField::new("floatRate", "Expected Float Rate", OutputKind::Percentage))
        .with_output(OutputField::new("monthlyPaymentLocked", "Payment if Locked", OutputKind::Currency))
        .with_output(OutputField::new("monthlyPaymentFloating", "Payment if Floating", OutputKind::Currency))
        .with_output(OutputField::new("monthlyDifference", "Monthly Difference", OutputKind::Currency))
        .with_output(OutputField::new("lifetimeDifference", "Lifetime Difference", OutputKind::Currency))
        .with_output(OutputField::new("coverageGapDays", "Coverage Gap (days)", OutputKind::Number))
        .with_output(OutputField::new("extensionCost", "Extension Cost", OutputKind::Currency))
        .with_output(OutputField::new("totalLockCost", "Total Lock Cost", OutputKind::Currency))
        .with_output(OutputField::new("breakEvenMonths", "Break-even", OutputKind::Horizon))
        .with_output(OutputField::new("rateRiskScore", "Rate Risk Score", OutputKind::Number))
        .with_output(OutputField::new("decision", "Decision", OutputKind::Text))
        .with_output(OutputField::new("riskLevel", "Risk Level", OutputKind::Text))
        .with_output(OutputField::new("summary", "Summary", OutputKind::Text))
        .with_output(OutputField::new("recommendation", "Recommendation", OutputKind::Text))
        .with_example(Example::new(
            "Rising rates",
            "A $400k loan with rates expected to rise half a point before closing.",
            InputRecord::from_typed(&RateLockInput::default()).unwrap_or_default(),
        ))
        .with_example(Example::new(
            "Closing after the lock expires",
            "A 30-day lock on a purchase closing in 45 days.",
            InputRecord::new()
                .with("loanAmount", 300_000.0)
                .with("currentRate", 7.0)
                .with("lockPeriodDays", 30.0)
                .with("daysToClosing", 45.0)
                .with("expectedRateChange", -0.25)
                .with("marketVolatility", "high"),
        ))
});
