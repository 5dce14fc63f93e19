//! Range Comparator
//!
//! Core logic for comparing an observed value against a crop's optimal range
//! and turning the comparison into weighted points.

use serde::{Deserialize, Serialize};

use crate::catalog::OptimalRange;

/// Points kept at the edge of the optimal range, as a fraction of the weight
pub const IN_RANGE_FLOOR: f64 = 0.7;

/// Where an observed value sits relative to the optimal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeFit {
    BelowRange,
    WithinRange,
    AboveRange,
}

impl RangeFit {
    pub fn display_text(&self) -> &'static str {
        match self {
            RangeFit::BelowRange => "below optimal range",
            RangeFit::WithinRange => "within optimal range",
            RangeFit::AboveRange => "above optimal range",
        }
    }
}

/// Result of comparing one value to one range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeComparison {
    pub fit: RangeFit,
    pub value: f64,
    pub range: OptimalRange,
    /// Distance to the nearest bound, 0 when inside
    pub distance_from_range: f64,
    /// 1.0 at the midpoint, 0.0 at either bound; 0.0 outside
    pub closeness: f64,
}

impl RangeComparison {
    pub fn is_within_range(&self) -> bool {
        self.fit == RangeFit::WithinRange
    }

    /// True when the value is further outside than `margin`
    pub fn is_beyond(&self, margin: f64) -> bool {
        !self.is_within_range() && self.distance_from_range > margin
    }

    /// Weighted points for this comparison.
    ///
    /// Inside the range points run from `0.7 × weight` at a bound up to the
    /// full weight at the midpoint. Outside they fall linearly from
    /// `0.7 × weight` to zero at `margin` beyond the bound.
    pub fn points(&self, weight: f64, margin: f64) -> f64 {
        if self.is_within_range() {
            return weight * (IN_RANGE_FLOOR + (1.0 - IN_RANGE_FLOOR) * self.closeness);
        }

        if margin <= 0.0 || self.distance_from_range > margin {
            return 0.0;
        }

        weight * IN_RANGE_FLOOR * (1.0 - self.distance_from_range / margin)
    }

    /// E.g. "27.0 °C (optimal 20-35)"
    pub fn format_with_context(&self, unit: &str) -> String {
        format!("{:.1}{} (optimal {}{})", self.value, unit, self.range, unit)
    }
}

/// Compare an observed value against an optimal range
pub fn compare_to_range(value: f64, range: &OptimalRange) -> RangeComparison {
    let (fit, distance) = if value < range.min {
        (RangeFit::BelowRange, range.min - value)
    } else if value > range.max {
        (RangeFit::AboveRange, value - range.max)
    } else {
        (RangeFit::WithinRange, 0.0)
    };

    let closeness = match fit {
        RangeFit::WithinRange if range.half_width() > 0.0 => {
            (1.0 - (value - range.midpoint()).abs() / range.half_width()).clamp(0.0, 1.0)
        }
        RangeFit::WithinRange => 1.0,
        _ => 0.0,
    };

    RangeComparison {
        fit,
        value,
        range: *range,
        distance_from_range: distance,
        closeness,
    }
}
