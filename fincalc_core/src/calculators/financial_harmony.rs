//! # Financial Harmony Score
//!
//! A 0-100 personal financial health score built from six sub-scores:
//!
//! | Area       | Weight | Full marks at                          |
//! |------------|--------|----------------------------------------|
//! | Savings    | 20%    | saving 20% of income                   |
//! | Emergency  | 20%    | 6 months of outgoings set aside        |
//! | Debt       | 20%    | debt payments ≤ 15% of income (0 at 50%) |
//! | Retirement | 20%    | savings at the age benchmark           |
//! | Credit     | 10%    | score of 800 (0 at 550)                |
//! | Protection | 10%    | insured                                |
//!
//! The retirement benchmark is a multiple of annual income that rises with
//! age: 1× at 30, 3× at 40, 6× at 50, 8× at 60 and 10× at 67, interpolated
//! linearly in between. Without income, annual outgoings stand in for it.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::finance::{linear_score, ratio, WeightedScore};
use crate::format::{format_number, NumberFormat};
use crate::record::InputRecord;
use crate::schema::{CalculatorDescriptor, Category, Example, InputField, OutputField, OutputKind};
use crate::validation::ValidationResult;

use super::{calculate_typed, validate_typed, TypedCalculator};

/// Calculator id
pub const ID: &str = "financial-harmony";

/// `(age, multiple of annual income)`, ascending by age
const RETIREMENT_MULTIPLES: [(f64, f64); 6] = [
    (22.0, 0.0),
    (30.0, 1.0),
    (40.0, 3.0),
    (50.0, 6.0),
    (60.0, 8.0),
    (67.0, 10.0),
];

const TARGET_SAVINGS_RATE: f64 = 20.0;
const TARGET_EMERGENCY_MONTHS: f64 = 6.0;

/// Sub-scores at or above this are reported as strengths
const STRENGTH_THRESHOLD: f64 = 80.0;
/// Sub-scores below this are reported as focus areas
const FOCUS_THRESHOLD: f64 = 50.0;

/// Retirement savings benchmark as a multiple of annual income
pub fn retirement_multiple(age: f64) -> f64 {
    let (first_age, first_multiple) = RETIREMENT_MULTIPLES[0];
    if age <= first_age {
        return first_multiple;
    }
    for pair in RETIREMENT_MULTIPLES.windows(2) {
        let ((a0, m0), (a1, m1)) = (pair[0], pair[1]);
        if age <= a1 {
            return m0 + (m1 - m0) * (age - a0) / (a1 - a0);
        }
    }
    RETIREMENT_MULTIPLES[RETIREMENT_MULTIPLES.len() - 1].1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHarmonyInput {
    pub monthly_income: f64,
    /// Living expenses, excluding debt payments
    pub monthly_expenses: f64,
    pub emergency_savings: f64,
    #[serde(default)]
    pub monthly_debt_payments: f64,
    #[serde(default)]
    pub total_debt: f64,
    #[serde(default)]
    pub retirement_savings: f64,
    pub age: f64,
    pub credit_score: f64,
    #[serde(default)]
    pub has_insurance: bool,
}

impl Default for FinancialHarmonyInput {
    fn default() -> Self {
        FinancialHarmonyInput {
            monthly_income: 6_000.0,
            monthly_expenses: 3_500.0,
            emergency_savings: 15_000.0,
            monthly_debt_payments: 500.0,
            total_debt: 20_000.0,
            retirement_savings: 60_000.0,
            age: 35.0,
            credit_score: 720.0,
            has_insurance: true,
        }
    }
}

impl FinancialHarmonyInput {
    pub fn monthly_surplus(&self) -> f64 {
        self.monthly_income - self.monthly_expenses - self.monthly_debt_payments
    }

    pub fn monthly_outgoings(&self) -> f64 {
        self.monthly_expenses + self.monthly_debt_payments
    }

    /// Monthly amount the retirement benchmark is a multiple of: income,
    /// or outgoings when there is no income
    pub fn retirement_base(&self) -> f64 {
        if self.monthly_income > 0.0 {
            self.monthly_income
        } else {
            self.monthly_outgoings()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHarmonyResult {
    /// Surplus after expenses and debt payments / income (%)
    pub savings_rate: Option<f64>,
    pub emergency_fund_months: Option<f64>,
    pub debt_to_income_ratio: Option<f64>,
    /// Target retirement savings for this age and income
    pub retirement_benchmark: f64,
    /// Retirement savings / benchmark (%)
    pub retirement_readiness: Option<f64>,
    pub savings_health_score: f64,
    pub emergency_health_score: f64,
    pub debt_health_score: f64,
    pub retirement_health_score: f64,
    pub credit_health_score: f64,
    pub protection_health_score: f64,
    pub harmony_score: f64,
}

impl FinancialHarmonyResult {
    /// `(area, sub-score)` pairs in display order
    pub fn areas(&self) -> [(&'static str, f64); 6] {
        [
            ("savings", self.savings_health_score),
            ("emergency fund", self.emergency_health_score),
            ("debt", self.debt_health_score),
            ("retirement", self.retirement_health_score),
            ("credit", self.credit_health_score),
            ("protection", self.protection_health_score),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHarmonyNarrative {
    pub harmony_level: String,
    pub strengths: Vec<String>,
    pub focus_areas: Vec<String>,
    pub recommendation: String,
}

pub fn validate(input: &FinancialHarmonyInput) -> ValidationResult {
    validate_typed::<FinancialHarmonyCalculator>(input)
}

pub fn calculate(input: &FinancialHarmonyInput) -> CalcResult<FinancialHarmonyResult> {
    calculate_typed::<FinancialHarmonyCalculator>(input)
}

pub fn narrative(result: &FinancialHarmonyResult, format: &NumberFormat) -> FinancialHarmonyNarrative {
    FinancialHarmonyCalculator::narrate(result, format)
}

pub struct FinancialHarmonyCalculator;

impl TypedCalculator for FinancialHarmonyCalculator {
    type Input = FinancialHarmonyInput;
    type Result = FinancialHarmonyResult;
    type Narrative = FinancialHarmonyNarrative;

    fn descriptor() -> &'static CalculatorDescriptor {
        &DESCRIPTOR
    }

    fn check_rules(input: &FinancialHarmonyInput, result: &mut ValidationResult) {
        if input.monthly_expenses > input.monthly_income {
            result.warning("monthlyExpenses", "Monthly expenses exceed monthly income");
        }
        if input.total_debt > 0.0 && input.monthly_debt_payments == 0.0 {
            result.warning(
                "monthlyDebtPayments",
                "You have outstanding debt but no monthly debt payments",
            );
        }
    }

    fn compute(input: &FinancialHarmonyInput) -> FinancialHarmonyResult {
        let savings_rate = ratio(input.monthly_surplus(), input.monthly_income).map(|r| r * 100.0);
        let emergency_fund_months = ratio(input.emergency_savings, input.monthly_outgoings());
        let debt_to_income_ratio =
            ratio(input.monthly_debt_payments, input.monthly_income).map(|r| r * 100.0);
        let retirement_benchmark = retirement_multiple(input.age) * input.retirement_base() * 12.0;
        let retirement_readiness =
            ratio(input.retirement_savings, retirement_benchmark).map(|r| r * 100.0);

        let savings_health_score = savings_rate.map_or(0.0, |r| linear_score(r, 0.0, TARGET_SAVINGS_RATE));
        // No outgoings at all: any savings cover them indefinitely
        let emergency_health_score = emergency_fund_months
            .map_or(100.0, |m| linear_score(m, 0.0, TARGET_EMERGENCY_MONTHS));
        let debt_health_score = match debt_to_income_ratio {
            Some(dti) => linear_score(dti, 50.0, 15.0),
            None if input.monthly_debt_payments > 0.0 => 0.0,
            None => 100.0,
        };
        let retirement_health_score = match retirement_readiness {
            Some(readiness) => linear_score(readiness, 0.0, 100.0),
            // Too young for a benchmark
            None if retirement_multiple(input.age) == 0.0 => 100.0,
            // No income or outgoings to measure against
            None if input.retirement_savings > 0.0 => 100.0,
            None => 0.0,
        };
        let credit_health_score = linear_score(input.credit_score, 550.0, 800.0);
        let protection_health_score = if input.has_insurance { 100.0 } else { 0.0 };

        let harmony_score = WeightedScore::new()
            .add(savings_health_score, 0.2)
            .add(emergency_health_score, 0.2)
            .add(debt_health_score, 0.2)
            .add(retirement_health_score, 0.2)
            .add(credit_health_score, 0.1)
            .add(protection_health_score, 0.1)
            .score();

        FinancialHarmonyResult {
            savings_rate,
            emergency_fund_months,
            debt_to_income_ratio,
            retirement_benchmark,
            retirement_readiness,
            savings_health_score,
            emergency_health_score,
            debt_health_score,
            retirement_health_score,
            credit_health_score,
            protection_health_score,
            harmony_score,
        }
    }

    fn narrate(result: &FinancialHarmonyResult, format: &NumberFormat) -> FinancialHarmonyNarrative {
        let harmony_level = match result.harmony_score {
            s if s >= 80.0 => "Excellent",
            s if s >= 65.0 => "Good",
            s if s >= 50.0 => "Fair",
            s if s >= 35.0 => "Needs Attention",
            _ => "Critical",
        }
        .to_string();

        let areas = result.areas();
        let strengths = areas
            .iter()
            .filter(|(_, score)| *score >= STRENGTH_THRESHOLD)
            .map(|(name, _)| name.to_string())
            .collect();

        let mut weak: Vec<(&str, f64)> = areas
            .iter()
            .copied()
            .filter(|(_, score)| *score < FOCUS_THRESHOLD)
            .collect();
        weak.sort_by(|a, b| a.1.total_cmp(&b.1));
        let focus_areas = weak.iter().map(|(name, _)| name.to_string()).collect();

        let recommendation = match weak.first().map(|(name, _)| *name) {
            None => "Your finances are well balanced; keep your current habits and review them yearly."
                .to_string(),
            Some("savings") => "Aim to save at least 20% of your income, starting with automatic transfers."
                .to_string(),
            Some("emergency fund") => match result.emergency_fund_months {
                Some(months) => format!(
                    "Build your emergency fund from {} months toward 6 months of expenses.",
                    format_number(months, 1)
                ),
                None => "Build an emergency fund covering 6 months of expenses.".to_string(),
            },
            Some("debt") => "Pay down debt until payments are below 15% of your income.".to_string(),
            Some("retirement") => format!(
                "Increase retirement contributions; the benchmark for your age is {}.",
                format.currency(result.retirement_benchmark)
            ),
            Some("credit") => "Improve your credit by paying on time and keeping balances low."
                .to_string(),
            Some(_) => "Review your insurance coverage to protect your income and assets.".to_string(),
        };

        FinancialHarmonyNarrative {
            harmony_level,
            strengths,
            focus_areas,
            recommendation,
        }
    }
}

static DESCRIPTOR: Lazy<CalculatorDescriptor> = Lazy::new(|| {
    CalculatorDescriptor::new(ID, "Financial Harmony Score", Category::Finance, "personal-finance")
        .with_description(
            "Score your overall financial health across savings, emergency fund, debt, retirement, \
             credit and protection.",
        )
        .with_input(
            InputField::currency("monthlyIncome", "Monthly Income")
                .required()
                .range(0.0, 1_000_000.0)
                .step(100.0),
        )
        .with_input(
            InputField::currency("monthlyExpenses", "Monthly Expenses")
                .required()
                .range(0.0, 1_000_000.0)
                .step(100.0)
                .help("Living expenses, excluding debt payments"),
        )
        .with_input(
            InputField::currency("emergencySavings", "Emergency Savings")
                .required()
                .range(0.0, 10_000_000.0),
        )
        .with_input(
            InputField::currency("monthlyDebtPayments", "Monthly Debt Payments")
                .range(0.0, 1_000_000.0)
                .default_value(0.0),
        )
        .with_input(
            InputField::currency("totalDebt", "Total Debt")
                .range(0.0, 100_000_000.0)
                .default_value(0.0),
        )
        .with_input(
            InputField::currency("retirementSavings", "Retirement Savings")
                .range(0.0, 100_000_000.0)
                .default_value(0.0),
        )
        .with_input(InputField::number("age", "Age").required().range(18.0, 100.0))
        .with_input(
            InputField::number("creditScore", "Credit Score")
                .required()
                .range(300.0, 850.0),
        )
        .with_input(
            InputField::boolean("hasInsurance", "Health, Life or Disability Insurance")
                .default_value(false),
        )
        .with_output(OutputField::new("savingsRate", "Savings Rate", OutputKind::Percentage))
        .with_output(OutputField::new("emergencyFundMonths", "Emergency Fund", OutputKind::Months))
        .with_output(OutputField::new("debtToIncomeRatio", "Debt-to-Income", OutputKind::Percentage))
        .with_output(OutputField::new("retirementBenchmark", "Retirement Benchmark", OutputKind::Currency))
        .with_output(OutputField::new("retirementReadiness", "Retirement Readiness", OutputKind::Percentage))
        .with_output(OutputField::new("savingsHealthScore", "Savings Health (0-100)", OutputKind::Number))
        .with_output(OutputField::new("emergencyHealthScore", "Emergency Fund Health (0-100)", OutputKind::Number))
        .with_output(OutputField::new("debtHealthScore", "Debt Health (0-100)", OutputKind::Number))
        .with_output(OutputField::new("retirementHealthScore", "Retirement Health (0-100)", OutputKind::Number))
        .with_output(OutputField::new("creditHealthScore", "Credit Health (0-100)", OutputKind::Number))
        .with_output(OutputField::new("protectionHealthScore", "Protection Health (0-100)", OutputKind::Number))
        .with_output(OutputField::new("harmonyScore", "Harmony Score", OutputKind::Number))
        .with_output(OutputField::new("harmonyLevel", "Harmony Level", OutputKind::Text))
        .with_output(OutputField::new("strengths", "Strengths", OutputKind::List))
        .with_output(OutputField::new("focusAreas", "Focus Areas", OutputKind::List))
        .with_output(OutputField::new("recommendation", "Recommendation", OutputKind::Text))
        .with_example(Example::new(
            "Mid-career saver",
            "Solid savings and low debt, behind on retirement.",
            InputRecord::from_typed(&FinancialHarmonyInput::default()).unwrap_or_default(),
        ))
        .with_example(Example::new(
            "Stretched budget",
            "High debt payments and little cushion.",
            InputRecord::new()
                .with("monthlyIncome", 4_200.0)
                .with("monthlyExpenses", 3_000.0)
                .with("emergencySavings", 1_500.0)
                .with("monthlyDebtPayments", 1_100.0)
                .with("totalDebt", 45_000.0)
                .with("retirementSavings", 8_000.0)
                .with("age", 41.0)
                .with("creditScore", 610.0),
        ))
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retirement_multiples() {
        assert_eq!(retirement_multiple(18.0), 0.0);
        assert_eq!(retirement_multiple(30.0), 1.0);
        assert_eq!(retirement_multiple(35.0), 2.0);
        assert_eq!(retirement_multiple(50.0), 6.0);
        assert_eq!(retirement_multiple(67.0), 10.0);
        assert_eq!(retirement_multiple(80.0), 10.0);
    }

    #[test]
    fn test_default_profile() {
        let result = calculate(&FinancialHarmonyInput::default()).unwrap();
        assert!((result.savings_rate.unwrap() - 33.333).abs() < 1e-3);
        assert!((result.emergency_fund_months.unwrap() - 3.75).abs() < 1e-9);
        assert!((result.debt_to_income_ratio.unwrap() - 8.333).abs() < 1e-3);
        assert!((result.retirement_benchmark - 144_000.0).abs() < 1e-6);
        assert_eq!(result.savings_health_score, 100.0);
        assert!((result.emergency_health_score - 62.5).abs() < 1e-9);
        assert_eq!(result.debt_health_score, 100.0);
        assert!((result.credit_health_score - 68.0).abs() < 1e-9);
        // 0.2 × (100 + 62.5 + 100 + 41.67) + 0.1 × (68 + 100)
        assert!((result.harmony_score - 77.633).abs() < 1e-3);

        let text = narrative(&result, &NumberFormat::default());
        assert_eq!(text.harmony_level, "Good");
        assert_eq!(text.strengths, vec!["savings", "debt", "protection"]);
        assert_eq!(text.focus_areas, vec!["retirement"]);
        assert_eq!(
            text.recommendation,
            "Increase retirement contributions; the benchmark for your age is $144,000."
        );
    }

    #[test]
    fn test_stretched_budget() {
        let input = FinancialHarmonyInput {
            monthly_income: 4_200.0,
            monthly_expenses: 3_000.0,
            emergency_savings: 1_500.0,
            monthly_debt_payments: 1_100.0,
            total_debt: 45_000.0,
            retirement_savings: 8_000.0,
            age: 41.0,
            credit_score: 610.0,
            has_insurance: false,
        };
        let result = calculate(&input).unwrap();
        assert!(result.savings_rate.unwrap() > 0.0);
        assert!(result.harmony_score < 35.0);

        let text = narrative(&result, &NumberFormat::default());
        assert_eq!(text.harmony_level, "Critical");
        assert!(text.strengths.is_empty());
        assert!(text.focus_areas.contains(&"protection".to_string()));
    }

    #[test]
    fn test_zero_income_is_scored() {
        let input = FinancialHarmonyInput {
            monthly_income: 0.0,
            monthly_expenses: 0.0,
            monthly_debt_payments: 0.0,
            total_debt: 0.0,
            ..FinancialHarmonyInput::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.savings_rate, None);
        assert_eq!(result.emergency_fund_months, None);
        assert_eq!(result.retirement_readiness, None);
        assert!((0.0..=100.0).contains(&result.harmony_score));
    }

    #[test]
    fn test_zero_income_retirement_measured_against_outgoings() {
        let no_savings = FinancialHarmonyInput {
            monthly_income: 0.0,
            retirement_savings: 0.0,
            ..FinancialHarmonyInput::default()
        };
        let result = calculate(&no_savings).unwrap();
        // 2× annual outgoings of $4,000/month at 35
        assert!((result.retirement_benchmark - 96_000.0).abs() < 1e-6);
        assert_eq!(result.retirement_readiness, Some(0.0));
        assert_eq!(result.retirement_health_score, 0.0);

        let half_way = FinancialHarmonyInput {
            retirement_savings: 48_000.0,
            ..no_savings.clone()
        };
        let result = calculate(&half_way).unwrap();
        assert!((result.retirement_health_score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_income_or_outgoings_needs_savings_for_retirement_marks() {
        let input = FinancialHarmonyInput {
            monthly_income: 0.0,
            monthly_expenses: 0.0,
            monthly_debt_payments: 0.0,
            total_debt: 0.0,
            retirement_savings: 0.0,
            ..FinancialHarmonyInput::default()
        };
        assert_eq!(calculate(&input).unwrap().retirement_health_score, 0.0);

        let young = FinancialHarmonyInput { age: 20.0, ..input };
        assert_eq!(calculate(&young).unwrap().retirement_health_score, 100.0);
    }

    #[test]
    fn test_sub_scores_do_not_shadow_credit_input() {
        let outputs = FinancialHarmonyCalculator::descriptor();
        assert!(outputs.output("creditScore").is_none());
        assert!(outputs.output("creditHealthScore").is_some());
    }

    #[test]
    fn test_warnings() {
        let input = FinancialHarmonyInput {
            monthly_expenses: 7_000.0,
            monthly_debt_payments: 0.0,
            ..FinancialHarmonyInput::default()
        };
        let validation = validate(&input);
        assert!(validation.is_valid);
        assert!(validation.has_warning_for("monthlyExpenses"));
        assert!(validation.has_warning_for("monthlyDebtPayments"));
    }

    #[test]
    fn test_more_savings_never_lowers_score() {
        let mut previous = 0.0;
        for savings in [0.0, 5_000.0, 10_000.0, 20_000.0, 50_000.0] {
            let input = FinancialHarmonyInput {
                emergency_savings: savings,
                ..FinancialHarmonyInput::default()
            };
            let score = calculate(&input).unwrap().harmony_score;
            assert!(score >= previous);
            previous = score;
        }
    }
}
