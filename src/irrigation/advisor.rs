//! Irrigation Advisor
//!
//! Turns crop water use, rainfall and soil moisture into an urgency level, a
//! water volume and a date for the next irrigation.
//!
//! Classification (first match wins):
//!
//! | Condition                         | Urgency  |
//! |-----------------------------------|----------|
//! | moisture < 30 and dry > 5 days    | Critical |
//! | moisture < 40 and deficit > 10 mm | High     |
//! | moisture < 50 and dry > 3 days    | Medium   |
//! | moisture < 60 and deficit > 5 mm  | Low      |
//! | otherwise                         | not needed |
//!
//! Two escalations follow: a weak vegetation index lifts Low to Medium, and a
//! hot dry spell (rain < 5 mm, > 30 °C) lifts one level, up to High.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::evapotranspiration::{crop_coefficient, reference_et, Evapotranspiration};
use super::moisture::{resolve_soil_moisture, MoistureSource, SoilMoisture};
use crate::input::EnvironmentalInput;

/// Share of rainfall that reaches the root zone
pub const EFFECTIVE_RAIN_FRACTION: f64 = 0.8;

const STRESSED_VEGETATION_INDEX: f64 = 0.5;
const STRESSED_VEGETATION_FACTOR: f64 = 1.15;
const HOT_DRY_RAIN_MM: f64 = 5.0;
const HOT_DRY_TEMPERATURE_C: f64 = 30.0;
const HOT_DRY_FACTOR: f64 = 1.1;

/// How soon irrigation should happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    /// Minimum recommended volume (mm) at this urgency
    pub fn minimum_volume_mm(&self) -> f64 {
        match self {
            Urgency::Critical => 35.0,
            Urgency::High => 25.0,
            Urgency::Medium => 15.0,
            Urgency::Low => 10.0,
        }
    }

    /// Days until the next irrigation
    pub fn days_until_next(&self) -> u64 {
        match self {
            Urgency::Critical => 0,
            Urgency::High => 1,
            Urgency::Medium => 2,
            Urgency::Low => 3,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
            Urgency::Critical => "Critical",
        };
        f.write_str(name)
    }
}

/// Days until the next check when no irrigation is needed
pub const NOT_NEEDED_RECHECK_DAYS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationRecommendation {
    pub irrigation_needed: bool,
    /// `None` when no irrigation is needed
    pub urgency: Option<Urgency>,
    pub water_amount_mm: f64,
    pub reason: String,
    pub next_irrigation: NaiveDate,
    /// 0-100
    pub confidence: f64,
    pub soil_moisture: SoilMoisture,
    pub evapotranspiration: Evapotranspiration,
    pub crop_coefficient: f64,
    /// ET0 × Kc (mm/day)
    pub crop_water_requirement_mm_day: f64,
    pub water_deficit_mm: f64,
    /// Escalations applied after classification
    pub adjustments: Vec<String>,
}

/// Assess irrigation need for `input` as of `today`
pub fn assess_irrigation(input: &EnvironmentalInput, today: NaiveDate) -> IrrigationRecommendation {
    let et = reference_et(
        input.temperature_c,
        input.humidity_pct,
        input.radiation_sunshine_hours,
    );
    let kc = crop_coefficient(input.crop, input.growth_stage);
    let etc = et.et0_mm_day * kc;

    let dry_days = input.days_since_irrigation;
    let effective_rain = EFFECTIVE_RAIN_FRACTION * input.rainfall_mm;
    let deficit = (etc * f64::from(dry_days.max(1)) - effective_rain).max(0.0);

    let moisture = resolve_soil_moisture(input);
    let (mut urgency, base_reason) = classify(moisture.percent, dry_days, deficit);

    let mut volume = urgency
        .map(|u| deficit.max(u.minimum_volume_mm()))
        .unwrap_or(0.0);
    let mut adjustments = Vec::new();

    if let (Some(current), Some(ndvi)) = (urgency, input.vegetation_index) {
        if ndvi < STRESSED_VEGETATION_INDEX {
            if current == Urgency::Low {
                urgency = Some(Urgency::Medium);
            }
            volume *= STRESSED_VEGETATION_FACTOR;
            adjustments.push(format!(
                "Vegetation index {:.2} indicates crop stress: volume +15%",
                ndvi
            ));
        }
    }

    if let Some(current) = urgency {
        if input.rainfall_mm < HOT_DRY_RAIN_MM && input.temperature_c > HOT_DRY_TEMPERATURE_C {
            let raised = escalate_hot_dry(current);
            if raised != current {
                tracing::debug!("Hot dry spell: urgency {} -> {}", current, raised);
            }
            urgency = Some(raised);
            volume *= HOT_DRY_FACTOR;
            adjustments.push(format!(
                "Hot and dry ({:.1} °C, {:.1} mm rain): volume +10%",
                input.temperature_c, input.rainfall_mm
            ));
        }
    }

    let offset = urgency
        .map(|u| u.days_until_next())
        .unwrap_or(NOT_NEEDED_RECHECK_DAYS);
    let next_irrigation = today.checked_add_days(Days::new(offset)).unwrap_or(today);

    let mut confidence: f64 = match moisture.source {
        MoistureSource::Measured => 95.0,
        MoistureSource::Estimated => 75.0,
    };
    if input.vegetation_index.is_some() {
        confidence += 5.0;
    }

    IrrigationRecommendation {
        irrigation_needed: urgency.is_some(),
        urgency,
        water_amount_mm: (volume * 10.0).round() / 10.0,
        reason: describe(base_reason, &moisture, dry_days, deficit),
        next_irrigation,
        confidence: confidence.min(95.0),
        soil_moisture: moisture,
        evapotranspiration: et,
        crop_coefficient: kc,
        crop_water_requirement_mm_day: etc,
        water_deficit_mm: deficit,
        adjustments,
    }
}

/// First matching rule, most severe first
fn classify(moisture_pct: f64, dry_days: u32, deficit_mm: f64) -> (Option<Urgency>, &'static str) {
    if moisture_pct < 30.0 && dry_days > 5 {
        (Some(Urgency::Critical), "Soil is very dry after an extended dry spell")
    } else if moisture_pct < 40.0 && deficit_mm > 10.0 {
        (Some(Urgency::High), "Low soil moisture with a large water deficit")
    } else if moisture_pct < 50.0 && dry_days > 3 {
        (Some(Urgency::Medium), "Soil moisture is falling after several dry days")
    } else if moisture_pct < 60.0 && deficit_mm > 5.0 {
        (Some(Urgency::Low), "Crop water use is exceeding rainfall")
    } else {
        (None, "Soil moisture is adequate")
    }
}

fn escalate_hot_dry(urgency: Urgency) -> Urgency {
    match urgency {
        Urgency::Low => Urgency::Medium,
        Urgency::Medium | Urgency::High => Urgency::High,
        Urgency::Critical => Urgency::Critical,
    }
}

fn describe(base: &str, moisture: &SoilMoisture, dry_days: u32, deficit_mm: f64) -> String {
    let source = match moisture.source {
        MoistureSource::Measured => "measured",
        MoistureSource::Estimated => "estimated",
    };
    format!(
        "{}: {:.1}% soil moisture ({}), {} days since last watering, {:.1} mm deficit.",
        base, moisture.percent, source, dry_days, deficit_mm
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputDefaults;
    use crate::input::FieldObservation;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn input_with(f: impl FnOnce(&mut FieldObservation)) -> EnvironmentalInput {
        let mut obs = FieldObservation::new("Loamy", 10.0, 28.0);
        f(&mut obs);
        EnvironmentalInput::from_observation(&obs, &InputDefaults::default()).unwrap()
    }

    #[test]
    fn test_critical_when_dry_for_days() {
        let input = input_with(|o| {
            o.soil_moisture_pct = Some(25.0);
            o.days_since_irrigation = Some(6);
        });
        let rec = assess_irrigation(&input, today());

        assert_eq!(rec.urgency, Some(Urgency::Critical));
        assert!(rec.irrigation_needed);
        assert_eq!(rec.confidence, 95.0);
        assert_eq!(rec.next_irrigation, today());
        assert!(rec.water_amount_mm >= 35.0);
    }

    #[test]
    fn test_not_needed_when_wet() {
        let input = input_with(|o| {
            o.soil_moisture_pct = Some(70.0);
            o.rainfall_mm = Some(40.0);
            o.days_since_irrigation = Some(1);
        });
        let rec = assess_irrigation(&input, today());

        assert!(!rec.irrigation_needed);
        assert_eq!(rec.urgency, None);
        assert_eq!(rec.water_amount_mm, 0.0);
        assert_eq!(rec.next_irrigation, NaiveDate::from_ymd_opt(2024, 6, 6).unwrap());
    }

    #[test]
    fn test_stressed_vegetation_lifts_low() {
        // moisture 55 with a deficit over 5 mm -> Low
        let base = input_with(|o| {
            o.soil_moisture_pct = Some(55.0);
            o.rainfall_mm = Some(4.0);
            o.temperature_c = Some(26.0);
            o.days_since_irrigation = Some(2);
        });
        let rec = assess_irrigation(&base, today());
        assert_eq!(rec.urgency, Some(Urgency::Low));

        let mut stressed = base.clone();
        stressed.vegetation_index = Some(0.35);
        let rec_stressed = assess_irrigation(&stressed, today());
        assert_eq!(rec_stressed.urgency, Some(Urgency::Medium));
        assert!(rec_stressed.water_amount_mm > rec.water_amount_mm);
        assert_eq!(rec_stressed.adjustments.len(), 1);
    }

    #[test]
    fn test_hot_dry_escalation_caps_at_high() {
        let input = input_with(|o| {
            o.soil_moisture_pct = Some(35.0);
            o.rainfall_mm = Some(0.0);
            o.temperature_c = Some(36.0);
            o.days_since_irrigation = Some(3);
        });
        let rec = assess_irrigation(&input, today());
        assert_eq!(rec.urgency, Some(Urgency::High));

        assert_eq!(escalate_hot_dry(Urgency::Low), Urgency::Medium);
        assert_eq!(escalate_hot_dry(Urgency::High), Urgency::High);
        assert_eq!(escalate_hot_dry(Urgency::Critical), Urgency::Critical);
    }

    #[test]
    fn test_escalation_never_lowers_urgency() {
        for moisture in [10.0, 25.0, 35.0, 45.0, 55.0, 65.0] {
            for days in [0, 2, 4, 6, 9] {
                let plain = input_with(|o| {
                    o.soil_moisture_pct = Some(moisture);
                    o.rainfall_mm = Some(2.0);
                    o.temperature_c = Some(33.0);
                    o.days_since_irrigation = Some(days);
                });
                let (classified, _) = classify(moisture, days, 0.0);
                let rec = assess_irrigation(&plain, today());
                if let Some(base) = classified {
                    assert!(rec.urgency.unwrap() >= base);
                }
                assert!(rec.water_amount_mm >= 0.0);
            }
        }
    }

    #[test]
    fn test_estimated_moisture_confidence() {
        let input = input_with(|o| o.vegetation_index = Some(0.8));
        let rec = assess_irrigation(&input, today());
        assert_eq!(rec.soil_moisture.source, MoistureSource::Estimated);
        assert_eq!(rec.confidence, 80.0);
    }
}
