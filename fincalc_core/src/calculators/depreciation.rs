//! # Depreciation Schedule
//!
//! Book and tax depreciation schedules for a single asset.
//!
//! ## Methods
//!
//! - **Straight-line**: `(cost − salvage) / life` per year
//! - **Declining-balance** (150%) and **double-declining-balance** (200%):
//!   `book value × factor / life`, switching to straight-line over the
//!   remaining life once that is larger; never below salvage
//! - **Sum-of-years-digits**: `(cost − salvage) × remaining life / Σ years`
//! - **MACRS**: IRS General Depreciation System percentages. 3 to 20-year
//!   classes use the half-year convention tables; 27.5 and 39-year real
//!   property uses straight-line with the mid-month convention. Salvage is
//!   ignored.
//!
//! ## Partial First Year
//!
//! Book methods are computed per *life year* and then allocated to calendar
//! years by the share of the first calendar year the asset was in service.
//! An asset placed in service in July depreciates half a life year in its
//! first calendar year and gains a stub year at the end:
//!
//! ```text
//! calendar year 1 = f × L1
//! calendar year k = f × Lk + (1 − f) × L(k−1)
//! stub year       = (1 − f) × Ln
//! ```
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fincalc_core::calculators::depreciation::{calculate, DepreciationInput, DepreciationMethod};
//!
//! let input = DepreciationInput {
//!     asset_cost: 10_000.0,
//!     salvage_value: 1_000.0,
//!     useful_life: 5.0,
//!     method: DepreciationMethod::StraightLine,
//!     placed_in_service_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     ..DepreciationInput::default()
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.schedule.len(), 5);
//! assert!((result.first_year_depreciation - 1_800.0).abs() < 1e-9);
//! ```

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::format::NumberFormat;
use crate::record::InputRecord;
use crate::schema::{CalculatorDescriptor, Category, Example, InputField, OutputField, OutputKind};
use crate::validation::ValidationResult;

use super::{calculate_typed, validate_typed, TypedCalculator};

/// Calculator id
pub const ID: &str = "depreciation";

/// Amounts below this are treated as fully depreciated
const EPSILON: f64 = 1e-6;

// ============================================================================
// MACRS Tables (GDS, half-year convention, % of basis per recovery year)
// ============================================================================

const MACRS_3: [f64; 4] = [33.33, 44.45, 14.81, 7.41];
const MACRS_5: [f64; 6] = [20.0, 32.0, 19.2, 11.52, 11.52, 5.76];
const MACRS_7: [f64; 8] = [14.29, 24.49, 17.49, 12.49, 8.93, 8.92, 8.93, 4.46];
const MACRS_10: [f64; 11] = [10.0, 18.0, 14.4, 11.52, 9.22, 7.37, 6.55, 6.55, 6.56, 6.55, 3.28];
const MACRS_15: [f64; 16] = [
    5.0, 9.5, 8.55, 7.7, 6.93, 6.23, 5.9, 5.9, 5.91, 5.9, 5.91, 5.9, 5.91, 5.9, 5.91, 2.95,
];
const MACRS_20: [f64; 21] = [
    3.75, 7.219, 6.677, 6.177, 5.713, 5.285, 4.888, 4.522, 4.462, 4.461, 4.462, 4.461, 4.462,
    4.461, 4.462, 4.461, 4.462, 4.461, 4.462, 4.461, 2.231,
];

// ============================================================================
// Input Types
// ============================================================================

/// Depreciation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepreciationMethod {
    #[default]
    StraightLine,
    DecliningBalance,
    DoubleDecliningBalance,
    SumOfYearsDigits,
    Macrs,
}

impl DepreciationMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            DepreciationMethod::StraightLine => "Straight-line",
            DepreciationMethod::DecliningBalance => "150% declining balance",
            DepreciationMethod::DoubleDecliningBalance => "Double-declining balance",
            DepreciationMethod::SumOfYearsDigits => "Sum-of-years-digits",
            DepreciationMethod::Macrs => "MACRS",
        }
    }

    /// Declining-balance acceleration factor, if this is a declining method
    fn declining_factor(&self) -> Option<f64> {
        match self {
            DepreciationMethod::DecliningBalance => Some(1.5),
            DepreciationMethod::DoubleDecliningBalance => Some(2.0),
            _ => None,
        }
    }
}

/// MACRS property class (recovery period in years).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MacrsClass {
    #[serde(rename = "3")]
    Year3,
    #[serde(rename = "5")]
    Year5,
    #[default]
    #[serde(rename = "7")]
    Year7,
    #[serde(rename = "10")]
    Year10,
    #[serde(rename = "15")]
    Year15,
    #[serde(rename = "20")]
    Year20,
    /// Residential rental property
    #[serde(rename = "27.5")]
    Year27_5,
    /// Nonresidential real property
    #[serde(rename = "39")]
    Year39,
}

impl MacrsClass {
    pub fn recovery_years(&self) -> f64 {
        match self {
            MacrsClass::Year3 => 3.0,
            MacrsClass::Year5 => 5.0,
            MacrsClass::Year7 => 7.0,
            MacrsClass::Year10 => 10.0,
            MacrsClass::Year15 => 15.0,
            MacrsClass::Year20 => 20.0,
            MacrsClass::Year27_5 => 27.5,
            MacrsClass::Year39 => 39.0,
        }
    }

    /// Half-year convention percentages; `None` for real property classes
    pub fn half_year_table(&self) -> Option<&'static [f64]> {
        match self {
            MacrsClass::Year3 => Some(&MACRS_3),
            MacrsClass::Year5 => Some(&MACRS_5),
            MacrsClass::Year7 => Some(&MACRS_7),
            MacrsClass::Year10 => Some(&MACRS_10),
            MacrsClass::Year15 => Some(&MACRS_15),
            MacrsClass::Year20 => Some(&MACRS_20),
            MacrsClass::Year27_5 | MacrsClass::Year39 => None,
        }
    }
}

/// Input parameters for a depreciation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationInput {
    pub asset_cost: f64,

    #[serde(default)]
    pub salvage_value: f64,

    /// Useful life (years) for book methods
    pub useful_life: f64,

    #[serde(default)]
    pub method: DepreciationMethod,

    /// Recovery class, used by MACRS only
    #[serde(default)]
    pub macrs_class: MacrsClass,

    pub placed_in_service_date: NaiveDate,
}

impl Default for DepreciationInput {
    fn default() -> Self {
        DepreciationInput {
            asset_cost: 50_000.0,
            salvage_value: 5_000.0,
            useful_life: 7.0,
            method: DepreciationMethod::StraightLine,
            macrs_class: MacrsClass::Year7,
            placed_in_service_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }
}

impl DepreciationInput {
    /// Amount to be depreciated; MACRS ignores salvage
    pub fn depreciable_basis(&self) -> f64 {
        match self.method {
            DepreciationMethod::Macrs => self.asset_cost,
            _ => (self.asset_cost - self.salvage_value).max(0.0),
        }
    }

    /// Useful life as whole years (at least one)
    pub fn life_years(&self) -> usize {
        self.useful_life.round().max(1.0) as usize
    }

    /// Share of the first calendar year the asset is in service
    pub fn first_year_fraction(&self) -> f64 {
        let months_in_service = 13 - self.placed_in_service_date.month();
        months_in_service as f64 / 12.0
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// One calendar year of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationRow {
    pub year: u32,
    pub calendar_year: i32,
    pub beginning_book_value: f64,
    pub depreciation: f64,
    pub accumulated_depreciation: f64,
    pub ending_book_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationResult {
    pub method: DepreciationMethod,
    pub depreciable_basis: f64,
    pub schedule: Vec<DepreciationRow>,
    pub first_year_depreciation: f64,
    pub total_depreciation: f64,
    pub average_annual_depreciation: f64,
    /// Calendar years in the schedule
    pub recovery_years: u32,
    /// MACRS class when the MACRS method is used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macrs_class: Option<MacrsClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationNarrative {
    pub method_summary: String,
}

pub fn validate(input: &DepreciationInput) -> ValidationResult {
    validate_typed::<DepreciationCalculator>(input)
}

pub fn calculate(input: &DepreciationInput) -> CalcResult<DepreciationResult> {
    calculate_typed::<DepreciationCalculator>(input)
}

pub fn narrative(result: &DepreciationResult, format: &NumberFormat) -> DepreciationNarrative {
    DepreciationCalculator::narrate(result, format)
}

// ============================================================================
// Schedules
// ============================================================================

/// Depreciation per life year for the book methods
fn life_year_amounts(input: &DepreciationInput) -> Vec<f64> {
    let life = input.life_years();
    let basis = input.depreciable_basis();

    match input.method {
        DepreciationMethod::SumOfYearsDigits => {
            let digits = (life * (life + 1) / 2) as f64;
            (1..=life)
                .map(|k| basis * (life - k + 1) as f64 / digits)
                .collect()
        }
        method => match method.declining_factor() {
            Some(factor) => {
                let rate = factor / life as f64;
                let mut book = input.asset_cost;
                (1..=life)
                    .map(|k| {
                        let remaining = book - input.salvage_value;
                        let declining = book * rate;
                        let straight = remaining / (life - k + 1) as f64;
                        let amount = declining.max(straight).min(remaining).max(0.0);
                        book -= amount;
                        amount
                    })
                    .collect()
            }
            None => vec![basis / life as f64; life],
        },
    }
}

/// Spread life-year amounts over calendar years given the first-year share
fn allocate_to_calendar_years(life_amounts: &[f64], first_year_fraction: f64) -> Vec<f64> {
    if (first_year_fraction - 1.0).abs() < EPSILON {
        return life_amounts.to_vec();
    }
    let f = first_year_fraction;
    (0..=life_amounts.len())
        .map(|i| {
            let current = life_amounts.get(i).copied().unwrap_or(0.0);
            let previous = if i == 0 { 0.0 } else { life_amounts[i - 1] };
            f * current + (1.0 - f) * previous
        })
        .collect()
}

/// Straight-line, mid-month convention for residential and nonresidential real property
fn mid_month_amounts(basis: f64, recovery_years: f64, placed_month: u32) -> Vec<f64> {
    let annual = basis / recovery_years;
    let first = annual * (12.0 - placed_month as f64 + 0.5) / 12.0;
    let mut amounts = vec![first];
    let mut remaining = basis - first;
    while remaining > EPSILON {
        let amount = annual.min(remaining);
        amounts.push(amount);
        remaining -= amount;
    }
    amounts
}

fn calendar_amounts(input: &DepreciationInput) -> Vec<f64> {
    match input.method {
        DepreciationMethod::Macrs => {
            let basis = input.depreciable_basis();
            match input.macrs_class.half_year_table() {
                Some(table) => table.iter().map(|pct| basis * pct / 100.0).collect(),
                None => mid_month_amounts(
                    basis,
                    input.macrs_class.recovery_years(),
                    input.placed_in_service_date.month(),
                ),
            }
        }
        _ => allocate_to_calendar_years(&life_year_amounts(input), input.first_year_fraction()),
    }
}

/// Build schedule rows, clamping each year to the remaining basis and
/// letting the final year absorb rounding residue
fn build_schedule(input: &DepreciationInput, amounts: &[f64]) -> Vec<DepreciationRow> {
    let basis = input.depreciable_basis();
    let start_year = input.placed_in_service_date.year();
    let last = amounts.len().saturating_sub(1);

    let mut accumulated = 0.0;
    let mut rows = Vec::with_capacity(amounts.len());
    for (i, amount) in amounts.iter().enumerate() {
        let remaining = (basis - accumulated).max(0.0);
        let depreciation = if i == last { remaining } else { amount.min(remaining) };
        if depreciation <= EPSILON && i != 0 {
            break;
        }
        let beginning_book_value = input.asset_cost - accumulated;
        accumulated += depreciation;
        rows.push(DepreciationRow {
            year: i as u32 + 1,
            calendar_year: start_year + i as i32,
            beginning_book_value,
            depreciation,
            accumulated_depreciation: accumulated,
            ending_book_value: input.asset_cost - accumulated,
        });
    }
    rows
}

// ============================================================================
// Calculator
// ============================================================================

pub struct DepreciationCalculator;

impl TypedCalculator for DepreciationCalculator {
    type Input = DepreciationInput;
    type Result = DepreciationResult;
    type Narrative = DepreciationNarrative;

    fn descriptor() -> &'static CalculatorDescriptor {
        &DESCRIPTOR
    }

    fn check_rules(input: &DepreciationInput, result: &mut ValidationResult) {
        if input.salvage_value >= input.asset_cost {
            result.error("salvageValue", "Salvage value must be less than the asset cost");
            return;
        }
        if input.method == DepreciationMethod::Macrs && input.salvage_value > 0.0 {
            result.warning("salvageValue", "MACRS ignores salvage value; the full cost is depreciated");
        }
    }

    fn compute(input: &DepreciationInput) -> DepreciationResult {
        let schedule = build_schedule(input, &calendar_amounts(input));
        let total_depreciation = schedule.last().map_or(0.0, |row| row.accumulated_depreciation);
        let recovery_years = schedule.len() as u32;

        DepreciationResult {
            method: input.method,
            depreciable_basis: input.depreciable_basis(),
            first_year_depreciation: schedule.first().map_or(0.0, |row| row.depreciation),
            total_depreciation,
            average_annual_depreciation: if recovery_years == 0 {
                0.0
            } else {
                total_depreciation / recovery_years as f64
            },
            recovery_years,
            macrs_class: (input.method == DepreciationMethod::Macrs).then_some(input.macrs_class),
            schedule,
        }
    }

    fn narrate(result: &DepreciationResult, format: &NumberFormat) -> DepreciationNarrative {
        let method = match result.macrs_class {
            Some(class) if class.half_year_table().is_some() => format!(
                "MACRS {}-year property (half-year convention)",
                class.recovery_years()
            ),
            Some(class) => format!(
                "MACRS {}-year real property (mid-month convention)",
                class.recovery_years()
            ),
            None => result.method.display_name().to_string(),
        };

        DepreciationNarrative {
            method_summary: format!(
                "{} depreciates {} over {} calendar years, {} in the first year.",
                method,
                format.currency(result.total_depreciation),
                result.recovery_years,
                format.currency(result.first_year_depreciation)
            ),
        }
    }
}

static DESCRIPTOR: Lazy<CalculatorDescriptor> = Lazy::new(|| {
    CalculatorDescriptor::new(ID, "Depreciation Schedule", Category::Business, "accounting")
        .with_description(
            "Year-by-year depreciation using straight-line, declining-balance, \
             sum-of-years-digits or MACRS.",
        )
        .with_input(
            InputField::currency("assetCost", "Asset Cost")
                .required()
                .range(100.0, 100_000_000.0)
                .step(100.0),
        )
        .with_input(
            InputField::currency("salvageValue", "Salvage Value")
                .range(0.0, 100_000_000.0)
                .default_value(0.0),
        )
        .with_input(
            InputField::number("usefulLife", "Useful Life (years)")
                .required()
                .range(1.0, 50.0)
                .step(1.0),
        )
        .with_input(
            InputField::select(
                "method",
                "Depreciation Method",
                &[
                    ("straight-line", "Straight-line"),
                    ("declining-balance", "Declining balance (150%)"),
                    ("double-declining-balance", "Double-declining balance"),
                    ("sum-of-years-digits", "Sum-of-years-digits"),
                    ("macrs", "MACRS"),
                ],
            )
            .required()
            .default_value("straight-line"),
        )
        .with_input(
            InputField::select(
                "macrsClass",
                "MACRS Property Class",
                &[
                    ("3", "3-year"),
                    ("5", "5-year (vehicles, computers)"),
                    ("7", "7-year (furniture, equipment)"),
                    ("10", "10-year"),
                    ("15", "15-year (land improvements)"),
                    ("20", "20-year"),
                    ("27.5", "27.5-year (residential rental)"),
                    ("39", "39-year (nonresidential real property)"),
                ],
            )
            .default_value("7")
            .help("Used only with the MACRS method"),
        )
        .with_input(InputField::date("placedInServiceDate", "Placed in Service").required())
        .with_output(OutputField::new("depreciableBasis", "Depreciable Basis", OutputKind::Currency))
        .with_output(OutputField::new("firstYearDepreciation", "First-Year Depreciation", OutputKind::Currency))
        .with_output(OutputField::new("totalDepreciation", "Total Depreciation", OutputKind::Currency))
        .with_output(OutputField::new("averageAnnualDepreciation", "Average Annual Depreciation", OutputKind::Currency))
        .with_output(OutputField::new("recoveryYears", "Recovery Years", OutputKind::Years))
        .with_output(OutputField::new("schedule", "Depreciation Schedule", OutputKind::Table))
        .with_output(OutputField::new("methodSummary", "Summary", OutputKind::Text))
        .with_example(Example::new(
            "Office equipment, straight-line",
            "A $50,000 asset with $5,000 salvage over 7 years.",
            InputRecord::from_typed(&DepreciationInput::default()).unwrap_or_default(),
        ))
        .with_example(Example::new(
            "Delivery van, MACRS 5-year",
            "A $42,000 vehicle placed in service mid-year.",
            InputRecord::new()
                .with("assetCost", 42_000.0)
                .with("usefulLife", 5.0)
                .with("method", "macrs")
                .with("macrsClass", "5")
                .with("placedInServiceDate", "2024-07-15"),
        ))
        .with_example(Example::new(
            "Rental building",
            "Residential rental property recovered over 27.5 years.",
            InputRecord::new()
                .with("assetCost", 275_000.0)
                .with("usefulLife", 27.5)
                .with("method", "macrs")
                .with("macrsClass", "27.5")
                .with("placedInServiceDate", "2024-03-01"),
        ))
});

#[cfg(test)]
mod tests {
    use super::*;

    fn input(method: DepreciationMethod, month: u32) -> DepreciationInput {
        DepreciationInput {
            asset_cost: 10_000.0,
            salvage_value: 1_000.0,
            useful_life: 5.0,
            method,
            macrs_class: MacrsClass::Year5,
            placed_in_service_date: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
        }
    }

    fn amounts(result: &DepreciationResult) -> Vec<f64> {
        result.schedule.iter().map(|row| row.depreciation).collect()
    }

    fn assert_amounts(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{:?}", actual);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_straight_line_full_year() {
        let result = calculate(&input(DepreciationMethod::StraightLine, 1)).unwrap();
        assert_amounts(&amounts(&result), &[1_800.0; 5]);
        assert_eq!(result.schedule[0].calendar_year, 2024);
        assert_eq!(result.schedule[4].calendar_year, 2028);
        assert!((result.schedule[4].ending_book_value - 1_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_straight_line_mid_year_adds_stub() {
        let result = calculate(&input(DepreciationMethod::StraightLine, 7)).unwrap();
        assert_amounts(&amounts(&result), &[900.0, 1_800.0, 1_800.0, 1_800.0, 1_800.0, 900.0]);
        assert_eq!(result.recovery_years, 6);
        assert!((result.total_depreciation - 9_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_double_declining_switches_and_stops_at_salvage() {
        let result = calculate(&input(DepreciationMethod::DoubleDecliningBalance, 1)).unwrap();
        assert_amounts(&amounts(&result), &[4_000.0, 2_400.0, 1_440.0, 864.0, 296.0]);
        for row in &result.schedule {
            assert!(row.ending_book_value >= 1_000.0 - 1e-6);
        }
    }

    #[test]
    fn test_declining_balance_never_below_salvage() {
        for month in [1, 4, 10] {
            let result = calculate(&input(DepreciationMethod::DecliningBalance, month)).unwrap();
            assert!((result.total_depreciation - 9_000.0).abs() < 1e-6);
            for row in &result.schedule {
                assert!(row.ending_book_value >= 1_000.0 - 1e-6);
                assert!(row.depreciation >= 0.0);
            }
        }
    }

    #[test]
    fn test_sum_of_years_digits() {
        let mut syd = input(DepreciationMethod::SumOfYearsDigits, 1);
        syd.asset_cost = 15_000.0;
        syd.salvage_value = 0.0;
        let result = calculate(&syd).unwrap();
        assert_amounts(&amounts(&result), &[5_000.0, 4_000.0, 3_000.0, 2_000.0, 1_000.0]);
    }

    #[test]
    fn test_macrs_five_year() {
        let mut macrs = input(DepreciationMethod::Macrs, 7);
        macrs.asset_cost = 100_000.0;
        macrs.salvage_value = 0.0;
        let result = calculate(&macrs).unwrap();
        assert_amounts(
            &amounts(&result),
            &[20_000.0, 32_000.0, 19_200.0, 11_520.0, 11_520.0, 5_760.0],
        );
        assert_eq!(result.depreciable_basis, 100_000.0);
        assert_eq!(result.macrs_class, Some(MacrsClass::Year5));
    }

    #[test]
    fn test_macrs_schedules_sum_to_basis() {
        let classes = [
            MacrsClass::Year3,
            MacrsClass::Year5,
            MacrsClass::Year7,
            MacrsClass::Year10,
            MacrsClass::Year15,
            MacrsClass::Year20,
            MacrsClass::Year27_5,
            MacrsClass::Year39,
        ];
        for class in classes {
            let mut macrs = input(DepreciationMethod::Macrs, 3);
            macrs.asset_cost = 123_456.0;
            macrs.salvage_value = 0.0;
            macrs.macrs_class = class;
            let result = calculate(&macrs).unwrap();
            assert!(
                (result.total_depreciation - 123_456.0).abs() < 1e-6,
                "{:?}: {}",
                class,
                result.total_depreciation
            );
        }
    }

    #[test]
    fn test_macrs_residential_mid_month() {
        let mut rental = input(DepreciationMethod::Macrs, 1);
        rental.asset_cost = 200_000.0;
        rental.salvage_value = 0.0;
        rental.macrs_class = MacrsClass::Year27_5;
        let result = calculate(&rental).unwrap();
        // 11.5 months of 200,000 / 27.5 in the first year
        assert!((result.first_year_depreciation - 6_969.70).abs() < 0.01);
        assert_eq!(result.recovery_years, 28);
    }

    #[test]
    fn test_salvage_must_be_below_cost() {
        let mut bad = input(DepreciationMethod::StraightLine, 1);
        bad.salvage_value = 10_000.0;
        let validation = validate(&bad);
        assert!(validation.has_error_for("salvageValue"));
        assert!(calculate(&bad).is_err());
    }

    #[test]
    fn test_macrs_salvage_warning() {
        let validation = validate(&input(DepreciationMethod::Macrs, 1));
        assert!(validation.is_valid);
        assert!(validation.has_warning_for("salvageValue"));
    }

    #[test]
    fn test_narrative() {
        let result = calculate(&input(DepreciationMethod::Macrs, 1)).unwrap();
        let text = narrative(&result, &NumberFormat::default());
        assert_eq!(
            text.method_summary,
            "MACRS 5-year property (half-year convention) depreciates $10,000 over 6 calendar years, $2,000 in the first year."
        );
    }

    #[test]
    fn test_input_serialization() {
        let json = serde_json::to_value(input(DepreciationMethod::DoubleDecliningBalance, 7)).unwrap();
        assert_eq!(json["method"], "double-declining-balance");
        assert_eq!(json["macrsClass"], "5");
        assert_eq!(json["placedInServiceDate"], "2024-07-01");
    }
}
