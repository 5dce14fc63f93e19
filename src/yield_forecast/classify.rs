//! Status classes feeding the yield adjustments

use serde::{Deserialize, Serialize};

/// Soil moisture status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoistureStatus {
    VeryLow,
    Low,
    Optimal,
    Saturated,
}

impl MoistureStatus {
    pub fn classify(percent: f64) -> Self {
        if percent < 30.0 {
            MoistureStatus::VeryLow
        } else if percent < 45.0 {
            MoistureStatus::Low
        } else if percent <= 70.0 {
            MoistureStatus::Optimal
        } else {
            MoistureStatus::Saturated
        }
    }

    pub fn yield_factor(&self) -> f64 {
        match self {
            MoistureStatus::VeryLow => 0.80,
            MoistureStatus::Low => 0.92,
            MoistureStatus::Optimal => 1.03,
            MoistureStatus::Saturated => 0.95,
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            MoistureStatus::VeryLow => "Very Low",
            MoistureStatus::Low => "Low",
            MoistureStatus::Optimal => "Optimal",
            MoistureStatus::Saturated => "Saturated",
        }
    }
}

/// Vegetation health from a 0-1 vegetation index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VegetationHealth {
    Poor,
    Moderate,
    Good,
    Excellent,
}

impl VegetationHealth {
    pub fn classify(index: f64) -> Self {
        if index >= 0.7 {
            VegetationHealth::Excellent
        } else if index >= 0.5 {
            VegetationHealth::Good
        } else if index >= 0.3 {
            VegetationHealth::Moderate
        } else {
            VegetationHealth::Poor
        }
    }

    /// `None` when the class leaves yield unchanged
    pub fn yield_factor(&self) -> Option<f64> {
        match self {
            VegetationHealth::Excellent => Some(1.08),
            VegetationHealth::Good => Some(1.03),
            VegetationHealth::Moderate => None,
            VegetationHealth::Poor => Some(0.90),
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            VegetationHealth::Poor => "Poor",
            VegetationHealth::Moderate => "Moderate",
            VegetationHealth::Good => "Good",
            VegetationHealth::Excellent => "Excellent",
        }
    }
}

/// Temperature band relevant to yield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatBand {
    Ideal,
    Neutral,
    Heat,
}

impl HeatBand {
    pub fn classify(temperature_c: f64) -> Self {
        if (25.0..=30.0).contains(&temperature_c) {
            HeatBand::Ideal
        } else if temperature_c > 35.0 {
            HeatBand::Heat
        } else {
            HeatBand::Neutral
        }
    }

    pub fn yield_factor(&self) -> Option<f64> {
        match self {
            HeatBand::Ideal => Some(1.02),
            HeatBand::Neutral => None,
            HeatBand::Heat => Some(0.95),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moisture_boundaries() {
        assert_eq!(MoistureStatus::classify(29.9), MoistureStatus::VeryLow);
        assert_eq!(MoistureStatus::classify(30.0), MoistureStatus::Low);
        assert_eq!(MoistureStatus::classify(45.0), MoistureStatus::Optimal);
        assert_eq!(MoistureStatus::classify(70.0), MoistureStatus::Optimal);
        assert_eq!(MoistureStatus::classify(70.1), MoistureStatus::Saturated);
    }

    #[test]
    fn test_vegetation_boundaries() {
        assert_eq!(VegetationHealth::classify(0.7), VegetationHealth::Excellent);
        assert_eq!(VegetationHealth::classify(0.5), VegetationHealth::Good);
        assert_eq!(VegetationHealth::classify(0.3), VegetationHealth::Moderate);
        assert_eq!(VegetationHealth::classify(0.29), VegetationHealth::Poor);
        assert_eq!(VegetationHealth::Moderate.yield_factor(), None);
    }

    #[test]
    fn test_factors_stay_in_bounds() {
        let factors = [
            MoistureStatus::VeryLow.yield_factor(),
            MoistureStatus::Optimal.yield_factor(),
            VegetationHealth::Excellent.yield_factor().unwrap(),
            VegetationHealth::Poor.yield_factor().unwrap(),
            HeatBand::Heat.yield_factor().unwrap(),
        ];
        assert!(factors.iter().all(|f| (0.80..=1.08).contains(f)));
        assert_eq!(HeatBand::classify(33.0), HeatBand::Neutral);
    }
}
