//! StatValue - Folded view of one attribute (Base + Flat → Increased)

use serde::{Deserialize, Serialize};

/// Represents an attribute value split into its modifier parts
///
/// Final value is calculated as:
/// `(base + flat) × (1 + increased)`
///
/// - `base`: The ranked base value from the attribute catalog
/// - `flat`: Sum of all `Add` entries
/// - `increased`: Sum of all `Mult` entries (as decimal, e.g., 0.40 = 40%)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub base: f64,
    pub flat: f64,
    pub increased: f64,
}

impl StatValue {
    /// Create a new StatValue with the given base
    pub fn with_base(base: f64) -> Self {
        StatValue {
            base,
            flat: 0.0,
            increased: 0.0,
        }
    }

    /// Calculate final value: (base + flat) × (1 + increased)
    pub fn compute(&self) -> f64 {
        self.total_flat() * self.total_increased_multiplier()
    }

    pub fn add_flat(&mut self, value: f64) {
        self.flat += value;
    }

    /// Add an increased% bonus (as decimal, e.g., 0.40 for 40%)
    pub fn add_increased(&mut self, value: f64) {
        self.increased += value;
    }

    /// Get the total flat value (base + flat additions)
    pub fn total_flat(&self) -> f64 {
        self.base + self.flat
    }

    /// Get the total increased multiplier (1 + sum of increased%)
    pub fn total_increased_multiplier(&self) -> f64 {
        1.0 + self.increased
    }

    /// Whether any modifier moved the value away from its base
    pub fn is_modified(&self) -> bool {
        self.flat != 0.0 || self.increased != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_basic() {
        let stat = StatValue::with_base(100.0);
        assert!((stat.compute() - 100.0).abs() < f64::EPSILON);
        assert!(!stat.is_modified());
    }

    #[test]
    fn test_compute_full_formula() {
        // (10 + 5) × (1 + 0.5) = 22.5
        let mut stat = StatValue::with_base(10.0);
        stat.add_flat(5.0);
        stat.add_increased(0.5);
        assert!((stat.compute() - 22.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_multiple_increased_stack_additively() {
        let mut stat = StatValue::with_base(100.0);
        stat.add_increased(0.20);
        stat.add_increased(0.30);
        // Should be 100 * (1 + 0.50) = 150, not 100 * 1.2 * 1.3 = 156
        assert!((stat.compute() - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_increased_reduces() {
        let mut stat = StatValue::with_base(100.0);
        stat.add_increased(-0.25);
        assert!((stat.compute() - 75.0).abs() < f64::EPSILON);
    }
}
