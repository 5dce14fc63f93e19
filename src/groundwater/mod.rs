//! Groundwater Resources
//!
//! ## Architecture
//! - `snapshot.rs` - per-state records, summary, rankings and state lookup
//! - `projection.rs` - stage-bucketed five-year projection with risk class
//! - `scenario.rs` - compound/linear what-if series for a single metric
//! - `trend.rs` - least-squares trend over multi-year state history

pub mod projection;
pub mod scenario;
pub mod snapshot;
pub mod trend;

pub use projection::{
    check_base_year, project_groundwater, year_after, ExtractionTrend, GroundwaterProjection,
    GrowthRates, ProjectedYear, RiskLevel, DEFAULT_BASE_YEAR,
};
pub use scenario::{
    forecast_state, scenario_series, ScenarioForecast, ScenarioMode, ScenarioParams, YearValue,
    MAX_PERIODS,
};
pub use snapshot::{
    GroundwaterSnapshot, Metric, RankedState, SnapshotSummary, StateRecord, StateStatus, StateSummary,
};
pub use trend::{
    forecast_history, forecast_trend, GroundwaterHistory, HistoryRow, TrendForecast, TrendMethod,
};
