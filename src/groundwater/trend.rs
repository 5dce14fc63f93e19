//! Multi-Year Trend Forecast
//!
//! Long-format history (`state, year, value`) for one groundwater metric.
//! A state's series is the per-year mean of its rows; the aggregate series is
//! the per-year sum across states. The forecast is an ordinary least-squares
//! line over (year, value), extended `periods` years past the last observed
//! year.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::projection::year_after;
use super::scenario::{YearValue, DEFAULT_PERIODS, MAX_PERIODS};
use super::snapshot::{GroundwaterSnapshot, AGGREGATE_LABEL};
use crate::error::{AdvisorError, AdvisorResult};
use crate::market::linear_fit_points;

/// Fewest observed years a trend is fitted on
pub const MIN_TREND_POINTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub state: String,
    pub year: i32,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMethod {
    LinearTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendForecast {
    pub state: String,
    pub method: TrendMethod,
    /// Change per year
    pub slope: f64,
    pub intercept: f64,
    pub history: Vec<YearValue>,
    pub forecast: Vec<YearValue>,
}

/// Yearly history for every state, in first-seen state order
#[derive(Debug, Clone, Default)]
pub struct GroundwaterHistory {
    rows: Vec<HistoryRow>,
    states: Vec<String>,
    by_name: FxHashMap<String, usize>,
}

impl GroundwaterHistory {
    pub fn new(rows: Vec<HistoryRow>) -> Self {
        let mut states = Vec::new();
        let mut by_name = FxHashMap::default();
        for row in &rows {
            let key = row.state.trim().to_lowercase();
            if !by_name.contains_key(&key) {
                by_name.insert(key, states.len());
                states.push(row.state.trim().to_string());
            }
        }
        Self { rows, states, by_name }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Resolved state label and its yearly series, oldest first.
    ///
    /// Aggregate labels sum every state per year. Otherwise the state is
    /// matched by exact name, then by the first state containing the query.
    pub fn series(&self, query: &str) -> AdvisorResult<(String, Vec<YearValue>)> {
        let (label, per_year) = if GroundwaterSnapshot::is_aggregate_query(query) {
            let mut sums: BTreeMap<i32, f64> = BTreeMap::new();
            for row in &self.rows {
                if let Some(value) = row.value.filter(|v| v.is_finite()) {
                    *sums.entry(row.year).or_insert(0.0) += value;
                }
            }
            (AGGREGATE_LABEL.to_string(), sums)
        } else {
            let state = self.find_state(query)?;
            let key = state.to_lowercase();
            let mut groups: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
            for row in self.rows.iter().filter(|r| r.state.trim().to_lowercase() == key) {
                if let Some(value) = row.value.filter(|v| v.is_finite()) {
                    let entry = groups.entry(row.year).or_insert((0.0, 0));
                    entry.0 += value;
                    entry.1 += 1;
                }
            }
            let means = groups
                .into_iter()
                .map(|(year, (sum, count))| (year, sum / count as f64))
                .collect();
            (state.to_string(), means)
        };

        if per_year.is_empty() {
            return Err(AdvisorError::invalid("state", label, "no numeric history"));
        }
        let series = per_year
            .into_iter()
            .map(|(year, value)| YearValue { year, value })
            .collect();
        Ok((label, series))
    }

    fn find_state(&self, query: &str) -> AdvisorResult<&str> {
        let key = query.trim().to_lowercase();
        if key.is_empty() {
            return Err(AdvisorError::MissingField { field: "state" });
        }
        if let Some(&idx) = self.by_name.get(&key) {
            return Ok(&self.states[idx]);
        }
        self.states
            .iter()
            .find(|s| s.to_lowercase().contains(&key))
            .map(String::as_str)
            .ok_or_else(|| AdvisorError::UnknownState(query.trim().to_string()))
    }
}

/// Least-squares trend over `series`, extended `periods` years past its last year
pub fn forecast_trend(series: &[YearValue], periods: u32) -> AdvisorResult<(f64, f64, Vec<YearValue>)> {
    if periods > MAX_PERIODS {
        return Err(AdvisorError::invalid("periods", periods, "must be at most 50"));
    }
    if series.len() < MIN_TREND_POINTS {
        return Err(AdvisorError::invalid(
            "history",
            series.len(),
            "at least two years are needed for a trend",
        ));
    }

    let (slope, intercept) = linear_fit_points(series.iter().map(|p| (f64::from(p.year), p.value)));
    let last_year = series.iter().map(|p| p.year).max().unwrap_or_default();

    let forecast = (1..=periods)
        .map(|offset| -> AdvisorResult<YearValue> {
            let year = year_after(last_year, offset)?;
            Ok(YearValue {
                year,
                value: slope * f64::from(year) + intercept,
            })
        })
        .collect::<AdvisorResult<Vec<_>>>()?;

    Ok((slope, intercept, forecast))
}

/// History and linear-trend forecast for a state or the aggregate
pub fn forecast_history(
    history: &GroundwaterHistory,
    state: &str,
    periods: Option<u32>,
) -> AdvisorResult<TrendForecast> {
    let (label, series) = history.series(state)?;
    let (slope, intercept, forecast) = forecast_trend(&series, periods.unwrap_or(DEFAULT_PERIODS))?;

    Ok(TrendForecast {
        state: label,
        method: TrendMethod::LinearTrend,
        slope,
        intercept,
        history: series,
        forecast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(state: &str, year: i32, value: f64) -> HistoryRow {
        HistoryRow {
            state: state.to_string(),
            year,
            value: Some(value),
        }
    }

    fn history() -> GroundwaterHistory {
        GroundwaterHistory::new(vec![
            row("Maharashtra", 2017, 30.0),
            row("Maharashtra", 2020, 33.0),
            row("Maharashtra", 2022, 35.0),
            row("Maharashtra", 2022, 37.0),
            row("Punjab", 2017, 22.0),
            row("Punjab", 2020, 23.0),
            HistoryRow {
                state: "Punjab".into(),
                year: 2022,
                value: None,
            },
            row("Goa", 2020, 0.2),
        ])
    }

    #[test]
    fn test_state_series_is_yearly_mean() {
        let (label, series) = history().series("maharashtra").unwrap();
        assert_eq!(label, "Maharashtra");
        assert_eq!(
            series,
            vec![
                YearValue { year: 2017, value: 30.0 },
                YearValue { year: 2020, value: 33.0 },
                YearValue { year: 2022, value: 36.0 },
            ]
        );
    }

    #[test]
    fn test_aggregate_series_sums_states() {
        let (label, series) = history().series("All States").unwrap();
        assert_eq!(label, AGGREGATE_LABEL);
        assert_eq!(series.len(), 3);
        assert_relative_eq!(series[1].value, 33.0 + 23.0 + 0.2, epsilon = 1e-9);
        assert_relative_eq!(series[2].value, 72.0, epsilon = 1e-9);
    }

    #[test]
    fn test_state_lookup() {
        let h = history();
        assert_eq!(h.states(), ["Maharashtra", "Punjab", "Goa"]);
        assert_eq!(h.series("PUNJ").unwrap().0, "Punjab");
        assert_eq!(
            h.series("Kerala").unwrap_err(),
            AdvisorError::UnknownState("Kerala".into())
        );
        assert_eq!(
            h.series(" ").unwrap_err(),
            AdvisorError::MissingField { field: "state" }
        );
    }

    #[test]
    fn test_linear_trend_on_uneven_years() {
        // value = 2 * (year - 2000)
        let series: Vec<YearValue> = [2010, 2011, 2015]
            .iter()
            .map(|&year| YearValue {
                year,
                value: 2.0 * f64::from(year - 2000),
            })
            .collect();
        let (slope, _, forecast) = forecast_trend(&series, 3).unwrap();

        assert_relative_eq!(slope, 2.0, epsilon = 1e-9);
        assert_eq!(forecast.iter().map(|p| p.year).collect::<Vec<_>>(), vec![2016, 2017, 2018]);
        assert_relative_eq!(forecast[2].value, 36.0, epsilon = 1e-6);
    }

    #[test]
    fn test_forecast_history_split() {
        let result = forecast_history(&history(), "Maharashtra", None).unwrap();
        assert_eq!(result.method, TrendMethod::LinearTrend);
        assert_eq!(result.history.len(), 3);
        assert_eq!(result.forecast.len(), DEFAULT_PERIODS as usize);
        assert_eq!(result.forecast[0].year, 2023);
        assert!(result.slope > 0.0);
        assert!(result.forecast[4].value > result.history[2].value);
    }

    #[test]
    fn test_short_series_rejected() {
        let err = forecast_history(&history(), "Goa", Some(5)).unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidValue { field: "history", .. }));
    }

    #[test]
    fn test_period_limit() {
        let err = forecast_history(&history(), "Maharashtra", Some(MAX_PERIODS + 1)).unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidValue { field: "periods", .. }));
        assert!(forecast_history(&history(), "Maharashtra", Some(0)).unwrap().forecast.is_empty());
    }

    #[test]
    fn test_state_without_values_rejected() {
        let h = GroundwaterHistory::new(vec![HistoryRow {
            state: "Sikkim".into(),
            year: 2020,
            value: None,
        }]);
        assert!(h.series("Sikkim").unwrap_err().is_validation());
    }
}
