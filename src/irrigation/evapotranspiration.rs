//! Evapotranspiration
//!
//! Simplified Penman-Monteith style reference ET from temperature, humidity
//! and sunshine, plus the per-crop, per-stage coefficients that turn it into
//! crop water use.

use serde::{Deserialize, Serialize};

use crate::catalog::CropKind;
use crate::input::GrowthStage;

/// Extraterrestrial radiation assumed for tropical latitudes (MJ m⁻² day⁻¹)
const EXTRATERRESTRIAL_RADIATION: f64 = 30.0;
/// Daylength used for the sunshine fraction (h)
const DAYLENGTH_H: f64 = 12.0;

/// Intermediate values of the ET calculation, kept for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evapotranspiration {
    /// Saturation vapour pressure (kPa)
    pub saturation_vp_kpa: f64,
    /// Actual vapour pressure (kPa)
    pub actual_vp_kpa: f64,
    pub vapour_pressure_deficit_kpa: f64,
    /// Incoming solar radiation (MJ m⁻² day⁻¹)
    pub solar_radiation: f64,
    /// Reference evapotranspiration (mm/day)
    pub et0_mm_day: f64,
}

/// Saturation vapour pressure at `temperature_c` (Tetens)
pub fn saturation_vapour_pressure(temperature_c: f64) -> f64 {
    0.6108 * (17.27 * temperature_c / (temperature_c + 237.3)).exp()
}

/// Reference evapotranspiration for one day
pub fn reference_et(temperature_c: f64, humidity_pct: f64, sunshine_hours: f64) -> Evapotranspiration {
    let es = saturation_vapour_pressure(temperature_c);
    let ea = es * humidity_pct.clamp(0.0, 100.0) / 100.0;
    let vpd = (es - ea).max(0.0);

    let sunshine_fraction = (sunshine_hours / DAYLENGTH_H).clamp(0.0, 1.0);
    let rs = (0.25 + 0.5 * sunshine_fraction) * EXTRATERRESTRIAL_RADIATION;

    // Radiation term (mm/day) plus an aerodynamic term driven by VPD
    let radiation_term = 0.408 * 0.0135 * rs * (temperature_c + 17.8);
    let aerodynamic_term = 0.5 * vpd;

    Evapotranspiration {
        saturation_vp_kpa: es,
        actual_vp_kpa: ea,
        vapour_pressure_deficit_kpa: vpd,
        solar_radiation: rs,
        et0_mm_day: (radiation_term + aerodynamic_term).max(0.0),
    }
}

/// Crop coefficient (Kc) for a crop at a growth stage, 1.0 when unlisted
pub fn crop_coefficient(crop: Option<CropKind>, stage: GrowthStage) -> f64 {
    let table: Option<[f64; 5]> = match crop {
        Some(CropKind::Rice) => Some([1.05, 1.10, 1.20, 1.15, 0.90]),
        Some(CropKind::Wheat) => Some([0.40, 0.75, 1.15, 1.10, 0.40]),
        Some(CropKind::Maize) => Some([0.30, 0.70, 1.20, 1.10, 0.60]),
        Some(CropKind::Cotton) => Some([0.35, 0.75, 1.15, 1.10, 0.70]),
        Some(CropKind::Sugarcane) => Some([0.40, 0.90, 1.25, 1.20, 0.75]),
        Some(CropKind::Soybean) => Some([0.40, 0.80, 1.15, 1.10, 0.50]),
        Some(CropKind::Potato) => Some([0.50, 0.80, 1.15, 1.10, 0.75]),
        Some(CropKind::Tomato) => Some([0.60, 0.80, 1.15, 1.10, 0.80]),
        _ => None,
    };

    table.map(|kc| kc[stage.index()]).unwrap_or(1.0)
}
