//! # Scoring Helpers
//!
//! Every risk, eligibility or health score in the calculators is a weighted
//! average of normalized sub-scores clamped to `[0, 100]`. Sub-scores are
//! either linear scalings of an input between two thresholds or step
//! lookups against a threshold table.
//!
//! ```rust
//! use fincalc_core::finance::{linear_score, step_lookup, WeightedScore};
//!
//! // 15% savings rate on a 0%..20% scale
//! let savings = linear_score(15.0, 0.0, 20.0);
//! assert_eq!(savings, 75.0);
//!
//! // credit score tiers, highest threshold first
//! let factor = step_lookup(760.0, &[(750.0, 0.85), (700.0, 0.95)], 1.0);
//! assert_eq!(factor, 0.85);
//!
//! let score = WeightedScore::new().add(savings, 0.5).add(100.0, 0.5).score();
//! assert_eq!(score, 87.5);
//! ```

/// Clamp a score into `[0, 100]`; `NaN` maps to 0
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Linear sub-score: 0 at `zero_at`, 100 at `full_at`, clamped.
///
/// Works for inverted scales too (`zero_at > full_at`), e.g. a debt ratio
/// where lower is better.
pub fn linear_score(value: f64, zero_at: f64, full_at: f64) -> f64 {
    if zero_at == full_at {
        return if value >= full_at { 100.0 } else { 0.0 };
    }
    clamp_score((value - zero_at) / (full_at - zero_at) * 100.0)
}

/// Threshold lookup: the first `(threshold, value)` whose threshold is
/// `<= input` wins. Tables are ordered from the highest threshold down.
pub fn step_lookup<T: Copy>(input: f64, table: &[(f64, T)], fallback: T) -> T {
    table
        .iter()
        .find(|(threshold, _)| input >= *threshold)
        .map(|(_, value)| *value)
        .unwrap_or(fallback)
}

/// Accumulates `(sub_score, weight)` pairs into a clamped weighted average.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedScore {
    weighted_sum: f64,
    total_weight: f64,
}

impl WeightedScore {
    pub fn new() -> Self {
        WeightedScore::default()
    }

    /// Add a sub-score (builder pattern). Sub-scores are clamped first.
    pub fn add(mut self, sub_score: f64, weight: f64) -> Self {
        if weight > 0.0 {
            self.weighted_sum += clamp_score(sub_score) * weight;
            self.total_weight += weight;
        }
        self
    }

    /// Weighted average in `[0, 100]`; 0 when nothing was added
    pub fn score(&self) -> f64 {
        if self.total_weight == 0.0 {
            0.0
        } else {
            clamp_score(self.weighted_sum / self.total_weight)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5.0), 0.0);
        assert_eq!(clamp_score(150.0), 100.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_linear_score_inverted() {
        // debt-to-income: 15% or less is perfect, 50% or more is zero
        assert_eq!(linear_score(10.0, 50.0, 15.0), 100.0);
        assert_eq!(linear_score(50.0, 50.0, 15.0), 0.0);
        assert!((linear_score(32.5, 50.0, 15.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_lookup_fallback() {
        let table = [(750.0, "excellent"), (700.0, "good"), (650.0, "fair")];
        assert_eq!(step_lookup(800.0, &table, "poor"), "excellent");
        assert_eq!(step_lookup(700.0, &table, "poor"), "good");
        assert_eq!(step_lookup(500.0, &table, "poor"), "poor");
    }

    #[test]
    fn test_weighted_score_ignores_zero_weights() {
        let score = WeightedScore::new().add(40.0, 0.0).add(80.0, 2.0).score();
        assert_eq!(score, 80.0);
        assert_eq!(WeightedScore::new().score(), 0.0);
    }
}
