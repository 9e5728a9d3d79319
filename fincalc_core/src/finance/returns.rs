//! # Investment Return Metrics
//!
//! Ratio helpers never return `NaN` or infinity: a zero or non-finite
//! denominator yields `None`, and break-even style results are expressed
//! with [`Horizon`] instead of dividing by a non-positive cash flow.
//!
//! ```rust
//! use fincalc_core::finance::{cap_rate, Horizon};
//!
//! assert_eq!(cap_rate(12_000.0, 200_000.0), Some(6.0));
//! assert_eq!(cap_rate(12_000.0, 0.0), None);
//!
//! assert_eq!(Horizon::from_ratio(6_000.0, 100.0), Horizon::Converges(60.0));
//! assert_eq!(Horizon::from_ratio(6_000.0, -20.0), Horizon::Never);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::units::Percent;

/// `numerator / denominator`, or `None` when the quotient is undefined
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

/// Capitalization rate (%): annual NOI / property value
pub fn cap_rate(annual_noi: f64, property_value: f64) -> Option<f64> {
    ratio(annual_noi, property_value).map(|r| r * 100.0)
}

/// Cash-on-cash return (%): annual pre-tax cash flow / cash invested
pub fn cash_on_cash(annual_cash_flow: f64, cash_invested: f64) -> Option<f64> {
    ratio(annual_cash_flow, cash_invested).map(|r| r * 100.0)
}

/// Debt service coverage ratio: annual NOI / annual debt service
pub fn dscr(annual_noi: f64, annual_debt_service: f64) -> Option<f64> {
    ratio(annual_noi, annual_debt_service)
}

/// Compound `amount` at `rate` per period for `periods` periods
pub fn grow(amount: f64, rate: Percent, periods: f64) -> f64 {
    amount * (1.0 + rate.fraction()).powf(periods)
}

/// Time needed to recover an amount from a recurring inflow.
///
/// Serialized as `{"kind":"converges","value":31.5}` or `{"kind":"never"}`.
/// The unit (months or years) is defined by the output that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Horizon {
    /// Recovered after this many periods
    Converges(f64),
    /// The inflow never recovers the amount
    Never,
}

impl Horizon {
    /// Periods needed to recover `amount` at `per_period`.
    ///
    /// - nothing to recover (`amount <= 0`) converges immediately
    /// - a non-positive inflow never recovers a positive amount
    pub fn from_ratio(amount: f64, per_period: f64) -> Horizon {
        if amount <= 0.0 {
            return Horizon::Converges(0.0);
        }
        if per_period <= 0.0 || !per_period.is_finite() {
            return Horizon::Never;
        }
        match ratio(amount, per_period) {
            Some(periods) => Horizon::Converges(periods),
            None => Horizon::Never,
        }
    }

    /// The number of periods, if the horizon converges
    pub fn periods(&self) -> Option<f64> {
        match self {
            Horizon::Converges(p) => Some(*p),
            Horizon::Never => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Horizon::Never)
    }

    /// Whether the horizon is reached within `limit` periods
    pub fn within(&self, limit: f64) -> bool {
        matches!(self, Horizon::Converges(p) if *p <= limit)
    }

    /// Total ordering where `Never` sorts after every converging value
    pub fn compare(&self, other: &Horizon) -> Ordering {
        match (self, other) {
            (Horizon::Converges(a), Horizon::Converges(b)) => a.total_cmp(b),
            (Horizon::Converges(_), Horizon::Never) => Ordering::Less,
            (Horizon::Never, Horizon::Converges(_)) => Ordering::Greater,
            (Horizon::Never, Horizon::Never) => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_guards() {
        assert_eq!(ratio(1.0, 0.0), None);
        assert_eq!(ratio(f64::NAN, 2.0), None);
        assert_eq!(ratio(3.0, 2.0), Some(1.5));
    }

    #[test]
    fn test_return_metrics() {
        assert_eq!(cash_on_cash(6_300.0, 63_000.0), Some(10.0));
        assert_eq!(dscr(15_000.0, 12_000.0), Some(1.25));
        assert_eq!(dscr(15_000.0, 0.0), None);
    }

    #[test]
    fn test_grow() {
        let value = grow(100_000.0, Percent(3.0), 2.0);
        assert!((value - 106_090.0).abs() < 1e-6);
        assert_eq!(grow(100_000.0, Percent(3.0), 0.0), 100_000.0);
    }

    #[test]
    fn test_horizon_edges() {
        assert_eq!(Horizon::from_ratio(0.0, -50.0), Horizon::Converges(0.0));
        assert_eq!(Horizon::from_ratio(-10.0, 50.0), Horizon::Converges(0.0));
        assert_eq!(Horizon::from_ratio(100.0, 0.0), Horizon::Never);
        assert!(Horizon::Converges(24.0).within(24.0));
        assert!(!Horizon::Never.within(1e9));
    }

    #[test]
    fn test_horizon_ordering() {
        assert_eq!(Horizon::Converges(5.0).compare(&Horizon::Never), Ordering::Less);
        assert_eq!(Horizon::Never.compare(&Horizon::Never), Ordering::Equal);
        assert_eq!(
            Horizon::Converges(7.0).compare(&Horizon::Converges(5.0)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_horizon_serialization() {
        let json = serde_json::to_string(&Horizon::Converges(12.5)).unwrap();
        assert_eq!(json, r#"{"kind":"converges","value":12.5}"#);
        let json = serde_json::to_string(&Horizon::Never).unwrap();
        assert_eq!(json, r#"{"kind":"never"}"#);
    }
}
