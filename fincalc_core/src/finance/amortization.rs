//! # Fixed-Rate Amortization
//!
//! ## Notation
//!
//! - `L` = Principal (loan amount)
//! - `r` = Monthly periodic rate (annual % / 100 / 12)
//! - `n` = Term in months
//! - `M` = Level monthly payment
//! - `k` = Number of payments already made
//!
//! ## Formulas
//!
//! ```text
//! M = L·r(1+r)^n / ((1+r)^n − 1)          (M = L/n when r = 0)
//! B_k = L(1+r)^k − M((1+r)^k − 1)/r       (B_k = L − M·k when r = 0)
//! PV = M·(1 − (1+r)^−n) / r
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fincalc_core::finance::{monthly_payment, remaining_balance};
//! use fincalc_core::units::{Percent, Years};
//!
//! let payment = monthly_payment(300_000.0, Percent(6.0), Years(30.0));
//! assert!((payment - 1798.65).abs() < 0.01);
//!
//! let balance = remaining_balance(300_000.0, Percent(6.0), Years(30.0), 360);
//! assert_eq!(balance, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::units::{Months, Percent, Years};

/// Level monthly payment for a fixed-rate, fully amortizing loan.
///
/// Returns 0 for a non-positive principal or a zero-length term, and
/// exactly `L / n` when the rate is zero.
pub fn monthly_payment(principal: f64, annual_rate: Percent, term: Years) -> f64 {
    let n = Months::from(term).periods();
    if principal <= 0.0 || n == 0 {
        return 0.0;
    }
    let r = annual_rate.monthly_fraction();
    if r == 0.0 {
        return principal / n as f64;
    }
    let growth = (1.0 + r).powi(n as i32);
    principal * (r * growth) / (growth - 1.0)
}

/// Outstanding balance after `payments_made` level payments.
///
/// Clamped to `[0, principal]`; returns 0 once the loan is fully paid.
pub fn remaining_balance(principal: f64, annual_rate: Percent, term: Years, payments_made: u32) -> f64 {
    let n = Months::from(term).periods();
    if principal <= 0.0 || payments_made >= n {
        return 0.0;
    }
    let payment = monthly_payment(principal, annual_rate, term);
    let r = annual_rate.monthly_fraction();
    let k = payments_made as i32;
    let balance = if r == 0.0 {
        principal - payment * payments_made as f64
    } else {
        let growth = (1.0 + r).powi(k);
        principal * growth - payment * (growth - 1.0) / r
    };
    balance.clamp(0.0, principal)
}

/// Total interest paid over the full term: `M·n − L`
pub fn total_interest(principal: f64, annual_rate: Percent, term: Years) -> f64 {
    let n = Months::from(term).periods();
    if principal <= 0.0 || n == 0 {
        return 0.0;
    }
    (monthly_payment(principal, annual_rate, term) * n as f64 - principal).max(0.0)
}

/// Present value of `n` level monthly payments discounted at the loan rate
pub fn present_value(payment: f64, annual_rate: Percent, term: Years) -> f64 {
    let n = Months::from(term).periods();
    let r = annual_rate.monthly_fraction();
    if r == 0.0 {
        return payment * n as f64;
    }
    payment * (1.0 - (1.0 + r).powi(-(n as i32))) / r
}

/// One year of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRow {
    /// Loan year (1-based)
    pub year: u32,
    /// Total payments made during the year
    pub payment: f64,
    /// Principal repaid during the year
    pub principal: f64,
    /// Interest paid during the year
    pub interest: f64,
    /// Balance at year end
    pub ending_balance: f64,
}

/// Year-by-year amortization schedule, simulated month by month.
///
/// The final payment is trimmed so the balance lands exactly on zero.
pub fn amortization_schedule(principal: f64, annual_rate: Percent, term: Years) -> Vec<AmortizationRow> {
    let n = Months::from(term).periods();
    if principal <= 0.0 || n == 0 {
        return Vec::new();
    }
    let payment = monthly_payment(principal, annual_rate, term);
    let r = annual_rate.monthly_fraction();

    let mut rows = Vec::with_capacity(((n + 11) / 12) as usize);
    let mut balance = principal;
    let mut current = AmortizationRow {
        year: 1,
        payment: 0.0,
        principal: 0.0,
        interest: 0.0,
        ending_balance: principal,
    };

    for month in 1..=n {
        let interest = balance * r;
        let mut principal_paid = payment - interest;
        if month == n || principal_paid > balance {
            principal_paid = balance;
        }
        balance -= principal_paid;

        current.payment += principal_paid + interest;
        current.principal += principal_paid;
        current.interest += interest;
        current.ending_balance = balance.max(0.0);

        if month % 12 == 0 || month == n {
            let next_year = current.year + 1;
            rows.push(current);
            current = AmortizationRow {
                year: next_year,
                payment: 0.0,
                principal: 0.0,
                interest: 0.0,
                ending_balance: balance,
            };
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_payment_known_value() {
        // 200k at 6.5% for 30 years = $1,264.14
        let payment = monthly_payment(200_000.0, Percent(6.5), Years(30.0));
        assert!((payment - 1264.14).abs() < 0.01);
    }

    #[test]
    fn test_zero_rate_degenerates_to_straight_division() {
        let payment = monthly_payment(120_000.0, Percent(0.0), Years(10.0));
        assert_eq!(payment, 1_000.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(monthly_payment(0.0, Percent(5.0), Years(30.0)), 0.0);
        assert_eq!(monthly_payment(100_000.0, Percent(5.0), Years(0.0)), 0.0);
        assert_eq!(total_interest(0.0, Percent(5.0), Years(30.0)), 0.0);
        assert!(amortization_schedule(0.0, Percent(5.0), Years(30.0)).is_empty());
    }

    #[test]
    fn test_present_value_recovers_principal() {
        let payment = monthly_payment(250_000.0, Percent(7.25), Years(15.0));
        let pv = present_value(payment, Percent(7.25), Years(15.0));
        assert!((pv - 250_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_remaining_balance() {
        let principal = 120_000.0;
        assert!((remaining_balance(principal, Percent(7.5), Years(30.0), 0) - principal).abs() < 1e-6);
        let after_six = remaining_balance(principal, Percent(7.5), Years(30.0), 6);
        assert!(after_six < principal && after_six > 119_000.0);
        assert_eq!(remaining_balance(principal, Percent(7.5), Years(30.0), 400), 0.0);
    }

    #[test]
    fn test_remaining_balance_zero_rate() {
        let balance = remaining_balance(12_000.0, Percent(0.0), Years(1.0), 3);
        assert!((balance - 9_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_schedule_matches_closed_form() {
        let schedule = amortization_schedule(150_000.0, Percent(6.0), Years(15.0));
        assert_eq!(schedule.len(), 15);
        let year5 = &schedule[4];
        let closed = remaining_balance(150_000.0, Percent(6.0), Years(15.0), 60);
        assert!((year5.ending_balance - closed).abs() < 0.01);
        assert_eq!(schedule.last().unwrap().ending_balance, 0.0);

        let principal_total: f64 = schedule.iter().map(|row| row.principal).sum();
        assert!((principal_total - 150_000.0).abs() < 0.01);

        let interest_total: f64 = schedule.iter().map(|row| row.interest).sum();
        let expected = total_interest(150_000.0, Percent(6.0), Years(15.0));
        assert!((interest_total - expected).abs() < 0.05);
    }
}
