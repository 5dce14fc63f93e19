//! Scenario Forecast
//!
//! What-if series from a single known value: compound (`v * (1 + rate)`) or
//! linear (`v + delta`) change per year. The base year is reported as history,
//! the following years as forecast.

use serde::{Deserialize, Serialize};

use super::projection::{check_base_year, year_after, DEFAULT_BASE_YEAR};
use super::snapshot::{GroundwaterSnapshot, Metric};
use crate::error::{AdvisorError, AdvisorResult};

pub const DEFAULT_PERIODS: u32 = 5;
pub const MAX_PERIODS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioMode {
    #[default]
    Compound,
    Linear,
}

impl ScenarioMode {
    /// Unrecognized modes fall back to compound
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "linear" => ScenarioMode::Linear,
            _ => ScenarioMode::Compound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    pub periods: u32,
    pub base_year: i32,
    pub mode: ScenarioMode,
    /// Fractional change per year, compound mode
    pub rate: f64,
    /// Absolute change per year, linear mode
    pub delta: f64,
}

impl ScenarioParams {
    /// Reject period counts above `MAX_PERIODS` and out-of-range base years
    pub fn validate(&self) -> AdvisorResult<()> {
        if self.periods > MAX_PERIODS {
            return Err(AdvisorError::invalid("periods", self.periods, "must be at most 50"));
        }
        check_base_year(self.base_year)?;
        Ok(())
    }
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            periods: DEFAULT_PERIODS,
            base_year: DEFAULT_BASE_YEAR,
            mode: ScenarioMode::Compound,
            rate: 0.0,
            delta: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioForecast {
    pub state: String,
    pub metric: Metric,
    pub base_year: i32,
    pub history: Vec<YearValue>,
    pub forecast: Vec<YearValue>,
    pub mode: ScenarioMode,
    pub rate: f64,
    pub delta: f64,
}

/// Base value followed by `periods` projected values
pub fn scenario_series(value: f64, params: &ScenarioParams) -> AdvisorResult<Vec<f64>> {
    params.validate()?;
    let mut series = Vec::with_capacity(params.periods as usize + 1);
    let mut v = value;
    series.push(v);
    for _ in 0..params.periods {
        v = match params.mode {
            ScenarioMode::Compound => v * (1.0 + params.rate),
            ScenarioMode::Linear => v + params.delta,
        };
        series.push(v);
    }
    Ok(series)
}

/// Scenario forecast of one metric for a state or the all-states aggregate
pub fn forecast_state(
    snapshot: &GroundwaterSnapshot,
    state: &str,
    metric: Metric,
    params: &ScenarioParams,
) -> AdvisorResult<ScenarioForecast> {
    params.validate()?;
    let record = snapshot.resolve(state)?;
    let base = metric
        .value(&record)
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            AdvisorError::invalid("metric", metric, "no numeric base value for this state")
        })?;

    let mut history = Vec::with_capacity(1);
    let mut forecast = Vec::with_capacity(params.periods as usize);
    for (offset, value) in (0u32..).zip(scenario_series(base, params)?) {
        let entry = YearValue {
            year: year_after(params.base_year, offset)?,
            value,
        };
        if offset == 0 {
            history.push(entry);
        } else {
            forecast.push(entry);
        }
    }

    Ok(ScenarioForecast {
        state: record.state,
        metric,
        base_year: params.base_year,
        history,
        forecast,
        mode: params.mode,
        rate: params.rate,
        delta: params.delta,
    })
}
