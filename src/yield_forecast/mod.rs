//! Yield Forecaster
//!
//! ## Architecture
//! - `classify.rs` - moisture, vegetation and temperature status classes
//! - `forecaster.rs` - base yield lookup and the multiplicative factor chain

pub mod classify;
pub mod forecaster;

pub use classify::{HeatBand, MoistureStatus, VegetationHealth};
pub use forecaster::{forecast_yield, Polarity, YieldFactor, YieldForecast, YieldInputs, DEFAULT_BASE_YIELD};
