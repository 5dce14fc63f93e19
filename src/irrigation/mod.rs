//! Irrigation Advisor
//!
//! ## Architecture
//! - `evapotranspiration.rs` - reference ET and crop coefficients
//! - `moisture.rs` - measured or estimated soil moisture
//! - `advisor.rs` - urgency classification, volume and next date

pub mod advisor;
pub mod evapotranspiration;
pub mod moisture;

pub use advisor::{assess_irrigation, IrrigationRecommendation, Urgency};
pub use evapotranspiration::{crop_coefficient, reference_et, Evapotranspiration};
pub use moisture::{estimate_soil_moisture, resolve_soil_moisture, MoistureSource, SoilMoisture};
