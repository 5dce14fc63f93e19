//! Farm Advisor
//!
//! Deterministic scoring and forecasting for farm advice:
//! - `suitability/`: weighted multi-factor crop ranking
//! - `irrigation/`: evapotranspiration, soil moisture and irrigation urgency
//! - `yield_forecast/`: base yield with multiplicative condition factors
//! - `groundwater/`: state snapshot, five-year projection, scenario and trend series
//! - `market/`: three-day commodity price forecast
//!
//! Every engine is a pure function of its inputs and the static crop catalog.
//! The `api` feature adds an axum server over them.

pub mod advice;
pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod groundwater;
pub mod input;
pub mod irrigation;
pub mod market;
pub mod suitability;
pub mod yield_forecast;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use advice::{advise, build_advisory, render_markdown, Advisory};
pub use catalog::{CropCatalog, CropKind, CropTemplate, SoilType};
pub use config::{AdvisorConfig, AdvisorContext, InputDefaults};
pub use error::{AdvisorError, AdvisorResult};
pub use groundwater::{
    forecast_history, forecast_state, project_groundwater, GroundwaterHistory, GroundwaterSnapshot,
};
pub use input::{EnvironmentalInput, FieldObservation, GrowthStage, WeatherSnapshot};
pub use irrigation::{assess_irrigation, IrrigationRecommendation, Urgency};
pub use market::{predict_3day_prices, price_outlook, PriceBook, PricePoint, PricePrediction, PriceTrend};
pub use suitability::{rank_crops, score_crop, SuitabilityResult};
pub use yield_forecast::{forecast_yield, YieldForecast, YieldInputs};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
