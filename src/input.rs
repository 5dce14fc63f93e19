//! Field Observations and Validated Inputs
//!
//! A `FieldObservation` is what arrives from a form or an HTTP body: every
//! field optional, names as the user typed them. `EnvironmentalInput` is the
//! validated, defaults-filled value every engine consumes. Conversion happens
//! once, at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{CropKind, SoilType};
use crate::config::InputDefaults;
use crate::error::{AdvisorError, AdvisorResult};

/// Crop development stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthStage {
    #[serde(alias = "seedling")]
    Seedling,
    #[serde(alias = "vegetative")]
    Vegetative,
    #[serde(alias = "flowering")]
    Flowering,
    #[serde(alias = "fruiting")]
    Fruiting,
    #[serde(alias = "maturity")]
    Maturity,
}

impl GrowthStage {
    /// Position in the crop-coefficient tables
    pub fn index(&self) -> usize {
        match self {
            GrowthStage::Seedling => 0,
            GrowthStage::Vegetative => 1,
            GrowthStage::Flowering => 2,
            GrowthStage::Fruiting => 3,
            GrowthStage::Maturity => 4,
        }
    }
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GrowthStage::Seedling => "Seedling",
            GrowthStage::Vegetative => "Vegetative",
            GrowthStage::Flowering => "Flowering",
            GrowthStage::Fruiting => "Fruiting",
            GrowthStage::Maturity => "Maturity",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for GrowthStage {
    type Err = AdvisorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "seedling" => Ok(GrowthStage::Seedling),
            "vegetative" => Ok(GrowthStage::Vegetative),
            "flowering" => Ok(GrowthStage::Flowering),
            "fruiting" => Ok(GrowthStage::Fruiting),
            "maturity" => Ok(GrowthStage::Maturity),
            _ => Err(AdvisorError::invalid("growth_stage", raw, "unknown growth stage")),
        }
    }
}

/// Accepted air temperature range (°C)
pub const MIN_TEMPERATURE_C: f64 = -60.0;
pub const MAX_TEMPERATURE_C: f64 = 70.0;

/// Raw observation as submitted by a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldObservation {
    pub location: Option<String>,
    pub soil_type: Option<String>,
    pub rainfall_mm: Option<f64>,
    pub temperature_c: Option<f64>,
    pub sunshine_hours: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub soil_moisture_pct: Option<f64>,
    pub vegetation_index: Option<f64>,
    pub growth_stage: Option<GrowthStage>,
    pub days_since_planting: Option<u32>,
    pub days_since_irrigation: Option<u32>,
    pub crop: Option<String>,
}

impl FieldObservation {
    /// Observation with just the three required fields
    pub fn new(soil_type: &str, rainfall_mm: f64, temperature_c: f64) -> Self {
        Self {
            soil_type: Some(soil_type.to_string()),
            rainfall_mm: Some(rainfall_mm),
            temperature_c: Some(temperature_c),
            ..Default::default()
        }
    }
}

/// Validated per-request environmental input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentalInput {
    pub location: String,
    pub soil_type: SoilType,
    /// Rainfall (mm) for the period under assessment
    pub rainfall_mm: f64,
    pub temperature_c: f64,
    /// Measured sunshine hours; `None` removes the sunshine factor from scoring
    pub sunshine_hours: Option<f64>,
    pub humidity_pct: f64,
    /// Measured soil moisture; `None` means estimate it
    pub soil_moisture_pct: Option<f64>,
    /// NDVI-like vegetation index in [0, 1]
    pub vegetation_index: Option<f64>,
    pub growth_stage: GrowthStage,
    pub days_since_planting: u32,
    pub days_since_irrigation: u32,
    /// Crop currently planted, if recognized
    pub crop: Option<CropKind>,
    /// Sunshine used by the ET0 radiation term (measured or default)
    pub radiation_sunshine_hours: f64,
}

impl EnvironmentalInput {
    /// Validate an observation and fill recognized defaults
    pub fn from_observation(
        obs: &FieldObservation,
        defaults: &InputDefaults,
    ) -> AdvisorResult<Self> {
        let soil_type = obs
            .soil_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(SoilType::parse)
            .ok_or(AdvisorError::MissingField { field: "soil_type" })?;

        let rainfall_mm = required("rainfall_mm", obs.rainfall_mm)?;
        if rainfall_mm < 0.0 {
            return Err(AdvisorError::invalid("rainfall_mm", rainfall_mm, "must not be negative"));
        }

        let temperature_c = required("temperature_c", obs.temperature_c)?;
        if !(MIN_TEMPERATURE_C..=MAX_TEMPERATURE_C).contains(&temperature_c) {
            return Err(AdvisorError::invalid(
                "temperature_c",
                temperature_c,
                "must be within [-60, 70]",
            ));
        }

        let sunshine_hours = bounded("sunshine_hours", obs.sunshine_hours, 0.0, 24.0)?;
        let humidity_pct = bounded("humidity_pct", obs.humidity_pct, 0.0, 100.0)?
            .unwrap_or(defaults.humidity_pct);
        let soil_moisture_pct = bounded("soil_moisture_pct", obs.soil_moisture_pct, 0.0, 100.0)?;
        let vegetation_index = bounded("vegetation_index", obs.vegetation_index, 0.0, 1.0)?;

        let crop = obs.crop.as_deref().and_then(CropKind::parse);
        if crop.is_none() {
            if let Some(name) = obs.crop.as_deref() {
                tracing::debug!("Unrecognized crop '{}', using generic coefficients", name);
            }
        }

        Ok(Self {
            location: obs
                .location
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("Unspecified")
                .to_string(),
            soil_type,
            rainfall_mm,
            temperature_c,
            sunshine_hours,
            humidity_pct,
            soil_moisture_pct,
            vegetation_index,
            growth_stage: obs.growth_stage.unwrap_or(defaults.growth_stage),
            days_since_planting: obs.days_since_planting.unwrap_or(0),
            days_since_irrigation: obs
                .days_since_irrigation
                .unwrap_or(defaults.days_since_irrigation),
            crop,
            radiation_sunshine_hours: sunshine_hours.unwrap_or(defaults.radiation_sunshine_hours),
        })
    }

    pub fn has_measured_moisture(&self) -> bool {
        self.soil_moisture_pct.is_some()
    }

    /// Weather view of this input, as a weather provider would report it
    pub fn weather(&self) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_c: self.temperature_c,
            humidity_pct: self.humidity_pct,
            rainfall_mm: self.rainfall_mm,
            sunshine_hours: self.sunshine_hours,
            description: String::new(),
        }
    }
}

fn required(field: &'static str, value: Option<f64>) -> AdvisorResult<f64> {
    let value = value.ok_or(AdvisorError::MissingField { field })?;
    if !value.is_finite() {
        return Err(AdvisorError::invalid(field, value, "must be a finite number"));
    }
    Ok(value)
}

fn bounded(field: &'static str, value: Option<f64>, min: f64, max: f64) -> AdvisorResult<Option<f64>> {
    match value {
        None => Ok(None),
        Some(v) if !v.is_finite() => Err(AdvisorError::invalid(field, v, "must be a finite number")),
        Some(v) if v < min || v > max => Err(AdvisorError::invalid(field, v, "outside accepted range")),
        Some(v) => Ok(Some(v)),
    }
}

/// Current weather as supplied by a weather provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub rainfall_mm: f64,
    #[serde(default)]
    pub sunshine_hours: Option<f64>,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields() {
        let defaults = InputDefaults::default();

        let mut obs = FieldObservation::new("Loamy", 800.0, 25.0);
        obs.soil_type = Some("   ".to_string());
        assert_eq!(
            EnvironmentalInput::from_observation(&obs, &defaults),
            Err(AdvisorError::MissingField { field: "soil_type" })
        );

        let mut obs = FieldObservation::new("Loamy", 800.0, 25.0);
        obs.rainfall_mm = None;
        assert_eq!(
            EnvironmentalInput::from_observation(&obs, &defaults),
            Err(AdvisorError::MissingField { field: "rainfall_mm" })
        );

        let mut obs = FieldObservation::new("Loamy", 800.0, 25.0);
        obs.temperature_c = None;
        assert_eq!(
            EnvironmentalInput::from_observation(&obs, &defaults),
            Err(AdvisorError::MissingField { field: "temperature_c" })
        );
    }

    #[test]
    fn test_defaults_filled_once() {
        let defaults = InputDefaults::default();
        let input =
            EnvironmentalInput::from_observation(&FieldObservation::new("clay", 20.0, 31.0), &defaults)
                .unwrap();

        assert_eq!(input.location, "Unspecified");
        assert_eq!(input.soil_type, SoilType::Clay);
        assert_eq!(input.humidity_pct, 60.0);
        assert_eq!(input.days_since_irrigation, 3);
        assert_eq!(input.growth_stage, GrowthStage::Vegetative);
        assert_eq!(input.sunshine_hours, None);
        assert_eq!(input.radiation_sunshine_hours, 8.0);
        assert!(!input.has_measured_moisture());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let defaults = InputDefaults::default();

        let mut obs = FieldObservation::new("Loamy", 800.0, 25.0);
        obs.vegetation_index = Some(1.3);
        let err = EnvironmentalInput::from_observation(&obs, &defaults).unwrap_err();
        assert!(err.is_validation());

        let mut obs = FieldObservation::new("Loamy", -1.0, 25.0);
        obs.humidity_pct = Some(50.0);
        assert!(EnvironmentalInput::from_observation(&obs, &defaults).is_err());

        let obs = FieldObservation::new("Loamy", 800.0, f64::NAN);
        assert!(EnvironmentalInput::from_observation(&obs, &defaults).is_err());
    }

    #[test]
    fn test_temperature_bounds() {
        let defaults = InputDefaults::default();
        for temperature in [-300.0, -60.5, 70.5] {
            let obs = FieldObservation::new("Loamy", 800.0, temperature);
            let err = EnvironmentalInput::from_observation(&obs, &defaults).unwrap_err();
            assert!(
                matches!(err, AdvisorError::InvalidValue { field: "temperature_c", .. }),
                "{} accepted",
                temperature
            );
        }
        for temperature in [MIN_TEMPERATURE_C, MAX_TEMPERATURE_C] {
            let obs = FieldObservation::new("Loamy", 800.0, temperature);
            assert!(EnvironmentalInput::from_observation(&obs, &defaults).is_ok());
        }
    }

    #[test]
    fn test_crop_resolution() {
        let defaults = InputDefaults::default();
        let mut obs = FieldObservation::new("Loamy", 800.0, 25.0);
        obs.crop = Some("Paddy".to_string());
        let input = EnvironmentalInput::from_observation(&obs, &defaults).unwrap();
        assert_eq!(input.crop, Some(CropKind::Rice));

        obs.crop = Some("Dragonfruit".to_string());
        let input = EnvironmentalInput::from_observation(&obs, &defaults).unwrap();
        assert_eq!(input.crop, None);
    }

    #[test]
    fn test_observation_from_json() {
        let obs: FieldObservation = serde_json::from_str(
            r#"{"soil_type": "Loamy", "rainfall_mm": 1200, "temperature_c": 27,
                "sunshine_hours": 9, "growth_stage": "flowering"}"#,
        )
        .unwrap();

        let input = EnvironmentalInput::from_observation(&obs, &InputDefaults::default()).unwrap();
        assert_eq!(input.growth_stage, GrowthStage::Flowering);
        assert_eq!(input.sunshine_hours, Some(9.0));
        assert_eq!(input.radiation_sunshine_hours, 9.0);
    }
}
