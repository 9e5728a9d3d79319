//! # Financial Formulas
//!
//! Pure formula functions shared by every calculator. Keeping them in one
//! place means the amortization math that half the calculators depend on is
//! implemented, documented and tested exactly once.
//!
//! ## Modules
//!
//! - [`amortization`] - Fixed-rate payment, remaining balance, schedules
//! - [`returns`] - Investment ratios (cap rate, cash-on-cash, DSCR) and [`Horizon`]
//! - [`scoring`] - Clamped weighted scores and threshold lookups
//!
//! ## Conventions
//!
//! - Money in base currency units as `f64`
//! - Rates as whole-number [`Percent`](crate::units::Percent)
//! - Loan terms in [`Years`](crate::units::Years), amortized monthly

pub mod amortization;
pub mod returns;
pub mod scoring;

pub use amortization::{
    amortization_schedule, monthly_payment, present_value, remaining_balance, total_interest,
    AmortizationRow,
};
pub use returns::{cap_rate, cash_on_cash, dscr, grow, ratio, Horizon};
pub use scoring::{clamp_score, linear_score, step_lookup, WeightedScore};
