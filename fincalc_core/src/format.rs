//! # Number Formatting
//!
//! Presentation helpers used by the narrative templates and by validation
//! messages. Formatting is kept out of the numeric core so that calculators
//! can be tested on raw numbers and the templating layer can be swapped.
//!
//! ```rust
//! use fincalc_core::format::NumberFormat;
//!
//! let fmt = NumberFormat::default();
//! assert_eq!(fmt.currency(1_234_567.891), "$1,234,568");
//! assert_eq!(fmt.percent(6.25), "6.25%");
//! assert_eq!(fmt.duration_months(30.0), "2 years 6 months");
//! ```

use serde::{Deserialize, Serialize};

use crate::finance::Horizon;

/// Currency and precision settings for narrative text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberFormat {
    /// Prefix for currency amounts
    pub currency_symbol: String,

    /// Decimal places for currency amounts
    pub currency_decimals: usize,

    /// Maximum decimal places for percentages (trailing zeros trimmed)
    pub percent_decimals: usize,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            currency_symbol: "$".to_string(),
            currency_decimals: 0,
            percent_decimals: 2,
        }
    }
}

impl NumberFormat {
    /// Format a currency amount: `$150,000`, `-$1,250`
    pub fn currency(&self, amount: f64) -> String {
        let rounded = round_to(amount, self.currency_decimals);
        let sign = if rounded < 0.0 { "-" } else { "" };
        format!(
            "{}{}{}",
            sign,
            self.currency_symbol,
            group_fixed(rounded.abs(), self.currency_decimals)
        )
    }

    /// Format a whole-number percentage: `6.25%`, `12%`
    pub fn percent(&self, value: f64) -> String {
        format!("{}%", format_number(value, self.percent_decimals))
    }

    /// Format a month count as years and months: `2 years 6 months`
    pub fn duration_months(&self, months: f64) -> String {
        let total = months.max(0.0).round() as u64;
        let (years, rem) = (total / 12, total % 12);
        match (years, rem) {
            (0, m) => plural(m, "month"),
            (y, 0) => plural(y, "year"),
            (y, m) => format!("{} {}", plural(y, "year"), plural(m, "month")),
        }
    }

    /// Format a break-even horizon expressed in months
    pub fn horizon_months(&self, horizon: &Horizon) -> String {
        match horizon {
            Horizon::Converges(months) => self.duration_months(*months),
            Horizon::Never => "never".to_string(),
        }
    }

    /// Format a break-even horizon expressed in years
    pub fn horizon_years(&self, horizon: &Horizon) -> String {
        match horizon {
            Horizon::Converges(years) => format!("{} years", format_number(*years, 1)),
            Horizon::Never => "never".to_string(),
        }
    }
}

/// Format a number with thousands separators and at most `max_decimals`
/// decimal places, trimming trailing zeros: `1,000`, `0.125`, `27.5`.
pub fn format_number(value: f64, max_decimals: usize) -> String {
    let rounded = round_to(value, max_decimals);
    let sign = if rounded < 0.0 { "-" } else { "" };
    let fixed = group_fixed(rounded.abs(), max_decimals);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    };
    format!("{}{}", sign, trimmed)
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // Avoid "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Fixed-precision rendering of a non-negative number with `,` grouping
fn group_fixed(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(50_000.0, 2), "50,000");
        assert_eq!(format_number(0.125, 3), "0.125");
        assert_eq!(format_number(27.5, 2), "27.5");
        assert_eq!(format_number(-1234.5, 1), "-1,234.5");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(-0.0001, 2), "0");
    }

    #[test]
    fn test_currency() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.currency(63_000.0), "$63,000");
        assert_eq!(fmt.currency(-1_250.4), "-$1,250");
        let cents = NumberFormat {
            currency_decimals: 2,
            ..NumberFormat::default()
        };
        assert_eq!(cents.currency(1_896.2049), "$1,896.20");
    }

    #[test]
    fn test_durations() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.duration_months(1.0), "1 month");
        assert_eq!(fmt.duration_months(24.0), "2 years");
        assert_eq!(fmt.duration_months(13.4), "1 year 1 month");
        assert_eq!(fmt.horizon_months(&Horizon::Never), "never");
        assert_eq!(fmt.horizon_years(&Horizon::Converges(7.25)), "7.3 years");
    }
}
