//! Numeric ranges (`1..5`, `..10`, `3..`)

use serde::{Deserialize, Serialize};

/// A range of integers with inclusive bounds
///
/// Open bounds from the host are represented as `i32::MIN` / `i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntegerRange {
    low: i32,
    high: i32,
}

impl IntegerRange {
    /// Constructs a range with a lower bound and an upper bound
    pub fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    /// A range with no upper bound
    pub fn at_least(low: i32) -> Self {
        Self::new(low, i32::MAX)
    }

    /// A range with no lower bound
    pub fn at_most(high: i32) -> Self {
        Self::new(i32::MIN, high)
    }

    pub fn lower_bound(&self) -> i32 {
        self.low
    }

    pub fn upper_bound(&self) -> i32 {
        self.high
    }

    /// True if `i` lies between the bounds, both inclusive
    pub fn is_in_range(&self, i: i32) -> bool {
        i >= self.low && i <= self.high
    }
}

/// A range of floats with inclusive bounds
///
/// Open bounds are represented as `-f32::MAX` / `f32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    low: f32,
    high: f32,
}

impl FloatRange {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    pub fn at_least(low: f32) -> Self {
        Self::new(low, f32::MAX)
    }

    pub fn at_most(high: f32) -> Self {
        Self::new(-f32::MAX, high)
    }

    pub fn lower_bound(&self) -> f32 {
        self.low
    }

    pub fn upper_bound(&self) -> f32 {
        self.high
    }

    pub fn is_in_range(&self, f: f32) -> bool {
        f >= self.low && f <= self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_range_endpoints_inclusive() {
        let range = IntegerRange::new(-3, 7);
        assert!(range.is_in_range(-3));
        assert!(range.is_in_range(7));
        assert!(range.is_in_range(0));
        assert!(!range.is_in_range(-4));
        assert!(!range.is_in_range(8));
    }

    #[test]
    fn test_integer_range_open_bounds() {
        assert!(IntegerRange::at_least(5).is_in_range(i32::MAX));
        assert!(!IntegerRange::at_least(5).is_in_range(4));
        assert!(IntegerRange::at_most(5).is_in_range(i32::MIN));
        assert_eq!(IntegerRange::at_most(5).lower_bound(), i32::MIN);
    }

    #[test]
    fn test_single_value_range() {
        let range = IntegerRange::new(4, 4);
        assert!(range.is_in_range(4));
        assert!(!range.is_in_range(3));
        assert!(!range.is_in_range(5));
    }

    #[test]
    fn test_float_range() {
        let range = FloatRange::new(0.5, 2.5);
        assert!(range.is_in_range(0.5));
        assert!(range.is_in_range(2.5));
        assert!(!range.is_in_range(2.6));
        assert_eq!(FloatRange::at_least(1.0).upper_bound(), f32::MAX);
    }
}
