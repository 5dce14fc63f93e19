//! Soil Moisture
//!
//! Uses the measured value when the caller has one, otherwise a bucket-style
//! estimate from rainfall, heat and days since the last watering.

use serde::{Deserialize, Serialize};

use crate::input::EnvironmentalInput;

pub const MOISTURE_FLOOR_PCT: f64 = 20.0;
pub const MOISTURE_CEILING_PCT: f64 = 80.0;

const BASELINE_PCT: f64 = 50.0;
const RAINFALL_GAIN_PER_MM: f64 = 0.3;
const HEAT_LOSS_PER_DEGREE: f64 = 0.8;
const HEAT_THRESHOLD_C: f64 = 20.0;
const DEPLETION_PER_DAY: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoistureSource {
    Measured,
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilMoisture {
    pub percent: f64,
    pub source: MoistureSource,
}

/// Estimate volumetric soil moisture (%) from weather and watering history
pub fn estimate_soil_moisture(rainfall_mm: f64, temperature_c: f64, days_since_irrigation: u32) -> f64 {
    let rain_gain = RAINFALL_GAIN_PER_MM * rainfall_mm.max(0.0);
    let heat_loss = HEAT_LOSS_PER_DEGREE * (temperature_c - HEAT_THRESHOLD_C).max(0.0);
    let depletion = DEPLETION_PER_DAY * f64::from(days_since_irrigation);

    (BASELINE_PCT + rain_gain - heat_loss - depletion).clamp(MOISTURE_FLOOR_PCT, MOISTURE_CEILING_PCT)
}

/// Soil moisture for an input, measured when available
pub fn resolve_soil_moisture(input: &EnvironmentalInput) -> SoilMoisture {
    match input.soil_moisture_pct {
        Some(percent) => SoilMoisture {
            percent,
            source: MoistureSource::Measured,
        },
        None => SoilMoisture {
            percent: estimate_soil_moisture(
                input.rainfall_mm,
                input.temperature_c,
                input.days_since_irrigation,
            ),
            source: MoistureSource::Estimated,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputDefaults;
    use crate::input::FieldObservation;

    #[test]
    fn test_estimate_components() {
        // 50 + 0.3*10 - 0.8*5 - 4*2 = 41
        assert!((estimate_soil_moisture(10.0, 25.0, 2) - 41.0).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_is_clamped() {
        assert_eq!(estimate_soil_moisture(0.0, 45.0, 20), MOISTURE_FLOOR_PCT);
        assert_eq!(estimate_soil_moisture(500.0, 10.0, 0), MOISTURE_CEILING_PCT);
    }

    #[test]
    fn test_measured_value_wins() {
        let mut obs = FieldObservation::new("Loamy", 0.0, 40.0);
        obs.soil_moisture_pct = Some(72.0);
        let input = EnvironmentalInput::from_observation(&obs, &InputDefaults::default()).unwrap();

        let moisture = resolve_soil_moisture(&input);
        assert_eq!(moisture.percent, 72.0);
        assert_eq!(moisture.source, MoistureSource::Measured);
    }
}
