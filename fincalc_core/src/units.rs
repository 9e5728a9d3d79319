//! # Unit Types
//!
//! Lightweight newtype wrappers for the quantities that are easy to confuse
//! in loan math: whole-number percentages versus fractions, and years versus
//! months. All wrappers serialize as bare numbers.
//!
//! ## Conventions
//!
//! - Money is plain `f64` in base currency units (dollars, not cents)
//! - Percentages are whole numbers: `Percent(6.5)` means 6.5%
//! - Loan terms are entered in years and amortized in months
//!
//! ## Example
//!
//! ```rust
//! use fincalc_core::units::{Months, Percent, Years};
//!
//! let rate = Percent(6.0);
//! assert!((rate.fraction() - 0.06).abs() < 1e-12);
//! assert!((rate.monthly_fraction() - 0.005).abs() < 1e-12);
//!
//! let term: Months = Years(30.0).into();
//! assert_eq!(term.0, 360.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

// ============================================================================
// Rates
// ============================================================================

/// A percentage expressed as a whole number (6.5 = 6.5%)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub f64);

impl Percent {
    /// The rate as a fraction (6.5% -> 0.065)
    pub fn fraction(self) -> f64 {
        self.0 / 100.0
    }

    /// The monthly periodic rate for an annual percentage (6% -> 0.005)
    pub fn monthly_fraction(self) -> f64 {
        self.0 / 100.0 / 12.0
    }

    /// Apply this percentage to an amount
    pub fn of(self, amount: f64) -> f64 {
        amount * self.fraction()
    }

    /// Express `part` as a percentage of `whole`; `None` if `whole` is zero
    pub fn ratio(part: f64, whole: f64) -> Option<Percent> {
        if whole == 0.0 || !whole.is_finite() || !part.is_finite() {
            None
        } else {
            Some(Percent(part / whole * 100.0))
        }
    }
}

impl From<f64> for Percent {
    fn from(value: f64) -> Self {
        Percent(value)
    }
}

impl Add for Percent {
    type Output = Percent;
    fn add(self, rhs: Self) -> Self::Output {
        Percent(self.0 + rhs.0)
    }
}

impl Sub for Percent {
    type Output = Percent;
    fn sub(self, rhs: Self) -> Self::Output {
        Percent(self.0 - rhs.0)
    }
}

// ============================================================================
// Time
// ============================================================================

/// A duration in years
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Years(pub f64);

/// A duration in months
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Months(pub f64);

impl From<Years> for Months {
    fn from(years: Years) -> Self {
        Months(years.0 * 12.0)
    }
}

impl From<Months> for Years {
    fn from(months: Months) -> Self {
        Years(months.0 / 12.0)
    }
}

impl Months {
    /// Whole number of payment periods, rounded to the nearest month
    pub fn periods(self) -> u32 {
        if self.0 <= 0.0 {
            0
        } else {
            self.0.round() as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_fraction() {
        assert!((Percent(7.5).fraction() - 0.075).abs() < 1e-12);
        assert!((Percent(12.0).monthly_fraction() - 0.01).abs() < 1e-12);
        assert!((Percent(20.0).of(150_000.0) - 30_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_ratio_guards_zero() {
        assert_eq!(Percent::ratio(5.0, 0.0), None);
        assert_eq!(Percent::ratio(25.0, 200.0), Some(Percent(12.5)));
    }

    #[test]
    fn test_years_months_conversion() {
        let months: Months = Years(15.0).into();
        assert_eq!(months.periods(), 180);
        let years: Years = Months(18.0).into();
        assert!((years.0 - 1.5).abs() < 1e-12);
        assert_eq!(Months(-3.0).periods(), 0);
    }

    #[test]
    fn test_serialization_is_transparent() {
        let json = serde_json::to_string(&Percent(6.75)).unwrap();
        assert_eq!(json, "6.75");
    }
}
