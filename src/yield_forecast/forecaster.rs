//! Yield Forecaster
//!
//! Starts from the crop's base yield and applies one multiplicative factor per
//! triggered condition. Each factor stays within 0.80-1.08, and each one that
//! fires leaves a (factor, polarity, description) entry behind.

use serde::{Deserialize, Serialize};

use super::classify::{HeatBand, MoistureStatus, VegetationHealth};
use crate::catalog::{CropCatalog, CropKind, CropTemplate};
use crate::input::{EnvironmentalInput, WeatherSnapshot};
use crate::irrigation::{IrrigationRecommendation, MoistureSource, SoilMoisture, Urgency};

/// Base yield (t/ha) for crops missing from the catalog
pub const DEFAULT_BASE_YIELD: f64 = 3.0;

const BASE_CONFIDENCE: f64 = 75.0;
const VEGETATION_CONFIDENCE_BONUS: f64 = 10.0;
const MOISTURE_CONFIDENCE_BONUS: f64 = 10.0;
const MAX_CONFIDENCE: f64 = 95.0;
const SUNNY_HOURS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldFactor {
    pub factor: String,
    pub polarity: Polarity,
    pub description: String,
    /// Multiplier applied to the running yield
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldForecast {
    pub crop_name: String,
    pub base_yield_t_ha: f64,
    pub predicted_yield_t_ha: f64,
    /// 0-95
    pub confidence: f64,
    pub factors: Vec<YieldFactor>,
    pub recommendations: Vec<String>,
    /// Days since planting as a share of the crop's growth duration, when known
    pub growth_progress_pct: Option<f64>,
}

/// Everything the forecaster reads, already produced by the other engines
#[derive(Debug, Clone)]
pub struct YieldInputs<'a> {
    pub crop: &'a str,
    pub irrigation: &'a IrrigationRecommendation,
    pub soil_moisture: SoilMoisture,
    pub vegetation_index: Option<f64>,
    pub weather: &'a WeatherSnapshot,
    pub days_since_planting: u32,
}

impl<'a> YieldInputs<'a> {
    /// Inputs for `crop`, taking weather and vegetation from `input`
    pub fn from_input(
        crop: &'a str,
        input: &EnvironmentalInput,
        irrigation: &'a IrrigationRecommendation,
        weather: &'a WeatherSnapshot,
    ) -> Self {
        Self {
            crop,
            irrigation,
            soil_moisture: irrigation.soil_moisture,
            vegetation_index: input.vegetation_index,
            weather,
            days_since_planting: input.days_since_planting,
        }
    }
}

/// Forecast yield (t/ha) for a crop under the given conditions
pub fn forecast_yield(catalog: &CropCatalog, inputs: &YieldInputs<'_>) -> YieldForecast {
    let template = lookup_template(catalog, inputs.crop);
    let base = template.map(|t| t.base_yield_t_ha).unwrap_or(DEFAULT_BASE_YIELD);
    let crop_name = template
        .map(|t| t.name.clone())
        .unwrap_or_else(|| inputs.crop.trim().to_string());

    let mut factors = Vec::new();
    let mut recommendations = Vec::new();

    irrigation_factor(inputs.irrigation, &mut factors, &mut recommendations);

    let moisture = MoistureStatus::classify(inputs.soil_moisture.percent);
    let moisture_polarity = if moisture == MoistureStatus::Optimal {
        Polarity::Positive
    } else {
        Polarity::Negative
    };
    factors.push(YieldFactor {
        factor: "Soil Moisture".into(),
        polarity: moisture_polarity,
        description: format!(
            "{} soil moisture ({:.1}%)",
            moisture.display_text(),
            inputs.soil_moisture.percent
        ),
        multiplier: moisture.yield_factor(),
    });
    match moisture {
        MoistureStatus::VeryLow | MoistureStatus::Low => {
            recommendations.push("Mulch to conserve soil moisture".to_string())
        }
        MoistureStatus::Saturated => {
            recommendations.push("Check field drainage to avoid waterlogging".to_string())
        }
        MoistureStatus::Optimal => {}
    }

    if let Some(index) = inputs.vegetation_index {
        let health = VegetationHealth::classify(index);
        if let Some(multiplier) = health.yield_factor() {
            let polarity = if multiplier >= 1.0 {
                Polarity::Positive
            } else {
                Polarity::Negative
            };
            factors.push(YieldFactor {
                factor: "Crop Health".into(),
                polarity,
                description: format!("{} vegetation index ({:.2})", health.display_text(), index),
                multiplier,
            });
        }
        if health == VegetationHealth::Poor {
            recommendations
                .push("Scout for pests and nutrient deficiency; consider a foliar feed".to_string());
        }
    }

    let heat = HeatBand::classify(inputs.weather.temperature_c);
    if let Some(multiplier) = heat.yield_factor() {
        let (polarity, description) = match heat {
            HeatBand::Heat => (
                Polarity::Negative,
                format!("Heat stress at {:.1} °C", inputs.weather.temperature_c),
            ),
            _ => (
                Polarity::Positive,
                format!("Ideal temperature ({:.1} °C)", inputs.weather.temperature_c),
            ),
        };
        factors.push(YieldFactor {
            factor: "Temperature".into(),
            polarity,
            description,
            multiplier,
        });
        if heat == HeatBand::Heat {
            recommendations.push("Irrigate in the evening to limit heat stress".to_string());
        }
    }

    if let Some(hours) = inputs.weather.sunshine_hours {
        if hours >= SUNNY_HOURS {
            factors.push(YieldFactor {
                factor: "Sunshine".into(),
                polarity: Polarity::Positive,
                description: format!("Good sunshine ({:.1} h/day)", hours),
                multiplier: 1.03,
            });
        }
    }

    let predicted = factors
        .iter()
        .fold(base, |acc, f| acc * f.multiplier)
        .max(0.0);

    let mut confidence = BASE_CONFIDENCE;
    if inputs.vegetation_index.is_some() {
        confidence += VEGETATION_CONFIDENCE_BONUS;
    }
    if inputs.soil_moisture.source == MoistureSource::Measured {
        confidence += MOISTURE_CONFIDENCE_BONUS;
    }

    let growth_progress_pct = template.filter(|t| t.growth_days > 0).map(|t| {
        (f64::from(inputs.days_since_planting) / f64::from(t.growth_days) * 100.0).min(100.0)
    });
    if let Some(progress) = growth_progress_pct {
        if progress >= 100.0 {
            recommendations.push(format!("{} has reached maturity; plan the harvest", crop_name));
        } else if progress >= 85.0 {
            recommendations.push(format!(
                "{} is {:.0}% through its season; prepare for harvest",
                crop_name, progress
            ));
        }
    }

    if recommendations.is_empty() {
        recommendations.push("Conditions are favourable; maintain current practices".to_string());
    }

    YieldForecast {
        crop_name,
        base_yield_t_ha: base,
        predicted_yield_t_ha: (predicted * 100.0).round() / 100.0,
        confidence: confidence.clamp(0.0, MAX_CONFIDENCE),
        factors,
        recommendations,
        growth_progress_pct,
    }
}

fn irrigation_factor(
    irrigation: &IrrigationRecommendation,
    factors: &mut Vec<YieldFactor>,
    recommendations: &mut Vec<String>,
) {
    let (multiplier, polarity, description) = match irrigation.urgency {
        None => (1.05, Polarity::Positive, "Adequate water supply".to_string()),
        Some(Urgency::Critical) => (
            0.85,
            Polarity::Negative,
            "Critical water stress".to_string(),
        ),
        Some(Urgency::High) => (0.92, Polarity::Negative, "High water stress".to_string()),
        Some(_) => return,
    };

    factors.push(YieldFactor {
        factor: "Irrigation".into(),
        polarity,
        description,
        multiplier,
    });
    if irrigation.irrigation_needed {
        recommendations.push(format!(
            "Apply {:.1} mm of water by {}",
            irrigation.water_amount_mm, irrigation.next_irrigation
        ));
    }
}

/// Catalog template for a recognized crop name or alias
fn lookup_template<'c>(catalog: &'c CropCatalog, crop: &str) -> Option<&'c CropTemplate> {
    CropKind::parse(crop).and_then(|kind| catalog.get(kind))
}
