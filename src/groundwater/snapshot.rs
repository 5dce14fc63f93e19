//! Groundwater State Snapshot
//!
//! One row per state from a single assessment year: annual availability,
//! annual extraction and the stage of extraction (extraction as a percentage
//! of availability). Any value may be missing in the source data.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AdvisorError, AdvisorResult};

/// Stage of extraction above which a state counts as critical
pub const CRITICAL_STAGE_PCT: f64 = 90.0;

/// Label used for the summed all-states record
pub const AGGREGATE_LABEL: &str = "All States (Aggregate)";

const AGGREGATE_ALIASES: [&str; 4] = [
    "all states",
    "all states (aggregate)",
    "all_states_aggregate",
    "all_states",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub state: String,
    pub availability: Option<f64>,
    pub extraction: Option<f64>,
    /// Stage of extraction (%)
    pub stage: Option<f64>,
}

impl StateRecord {
    pub fn is_critical(&self) -> bool {
        self.stage.is_some_and(|s| s > CRITICAL_STAGE_PCT)
    }

    /// Recorded stage, or extraction / availability when the stage is missing
    pub fn effective_stage(&self) -> Option<f64> {
        self.stage.or_else(|| match (self.extraction, self.availability) {
            (Some(e), Some(a)) if a > 0.0 => Some(e / a * 100.0),
            _ => None,
        })
    }
}

/// Snapshot column a ranking or forecast operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Availability,
    Extraction,
    Stage,
}

impl Metric {
    pub fn parse(raw: &str) -> AdvisorResult<Self> {
        match raw.trim().to_lowercase().as_str() {
            "availability" => Ok(Metric::Availability),
            "extraction" => Ok(Metric::Extraction),
            "stage" => Ok(Metric::Stage),
            _ => Err(AdvisorError::invalid(
                "metric",
                raw.trim(),
                "choose availability|extraction|stage",
            )),
        }
    }

    pub fn value(&self, record: &StateRecord) -> Option<f64> {
        match self {
            Metric::Availability => record.availability,
            Metric::Extraction => record.extraction,
            Metric::Stage => record.stage,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Availability => "availability",
            Metric::Extraction => "extraction",
            Metric::Stage => "stage",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateStatus {
    Critical,
    Ok,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSummary {
    #[serde(flatten)]
    pub record: StateRecord,
    pub status: StateStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub total_availability: Option<f64>,
    pub total_extraction: Option<f64>,
    pub extraction_stage_avg: Option<f64>,
    pub critical_states_count: usize,
    pub states: Vec<StateSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedState {
    pub state: String,
    pub value: f64,
}

/// All state records of one snapshot, indexed by lower-cased name
#[derive(Debug, Clone, Default)]
pub struct GroundwaterSnapshot {
    records: Vec<StateRecord>,
    by_name: FxHashMap<String, usize>,
}

impl GroundwaterSnapshot {
    pub fn new(records: Vec<StateRecord>) -> Self {
        let mut by_name = FxHashMap::default();
        for (idx, record) in records.iter().enumerate() {
            by_name.entry(record.state.to_lowercase()).or_insert(idx);
        }
        Self { records, by_name }
    }

    pub fn records(&self) -> &[StateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> SnapshotSummary {
        let stages: Vec<f64> = self.records.iter().filter_map(|r| r.stage).collect();
        let extraction_stage_avg = if stages.is_empty() {
            None
        } else {
            Some(stages.iter().sum::<f64>() / stages.len() as f64)
        };

        let states = self
            .records
            .iter()
            .map(|r| StateSummary {
                record: r.clone(),
                status: if r.is_critical() {
                    StateStatus::Critical
                } else {
                    StateStatus::Ok
                },
            })
            .collect();

        SnapshotSummary {
            total_availability: self.total(Metric::Availability),
            total_extraction: self.total(Metric::Extraction),
            extraction_stage_avg,
            critical_states_count: self.records.iter().filter(|r| r.is_critical()).count(),
            states,
        }
    }

    /// Sum of a metric over the states that report it
    pub fn total(&self, metric: Metric) -> Option<f64> {
        let mut values = self.records.iter().filter_map(|r| metric.value(r)).peekable();
        values.peek()?;
        Some(values.sum())
    }

    /// Highest `n` states by `metric`, skipping states without a value
    pub fn top_n(&self, metric: Metric, n: usize) -> Vec<RankedState> {
        let mut ranked: Vec<RankedState> = self
            .records
            .iter()
            .filter_map(|r| {
                metric.value(r).map(|value| RankedState {
                    state: r.state.clone(),
                    value,
                })
            })
            .collect();
        ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
        ranked.truncate(n);
        ranked
    }

    /// Summed record across all states. The stage is recomputed from the
    /// totals rather than summed.
    pub fn aggregate(&self) -> StateRecord {
        let availability = self.total(Metric::Availability);
        let extraction = self.total(Metric::Extraction);
        let stage = match (extraction, availability) {
            (Some(e), Some(a)) if a > 0.0 => Some(e / a * 100.0),
            _ => None,
        };
        StateRecord {
            state: AGGREGATE_LABEL.to_string(),
            availability,
            extraction,
            stage,
        }
    }

    pub fn is_aggregate_query(query: &str) -> bool {
        let key = query.trim().to_lowercase();
        AGGREGATE_ALIASES.contains(&key.as_str())
    }

    /// Case-insensitive exact name, then the first state containing `query`
    pub fn find_state(&self, query: &str) -> AdvisorResult<&StateRecord> {
        let key = query.trim().to_lowercase();
        if key.is_empty() {
            return Err(AdvisorError::MissingField { field: "state" });
        }
        if let Some(&idx) = self.by_name.get(&key) {
            return Ok(&self.records[idx]);
        }
        self.records
            .iter()
            .find(|r| r.state.to_lowercase().contains(&key))
            .ok_or_else(|| AdvisorError::UnknownState(query.trim().to_string()))
    }

    /// State record or the aggregate, depending on the query
    pub fn resolve(&self, query: &str) -> AdvisorResult<StateRecord> {
        if Self::is_aggregate_query(query) {
            Ok(self.aggregate())
        } else {
            self.find_state(query).cloned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(state: &str, availability: Option<f64>, extraction: Option<f64>, stage: Option<f64>) -> StateRecord {
        StateRecord {
            state: state.to_string(),
            availability,
            extraction,
            stage,
        }
    }

    fn snapshot() -> GroundwaterSnapshot {
        GroundwaterSnapshot::new(vec![
            record("Punjab", Some(18.8), Some(28.0), Some(149.0)),
            record("Rajasthan", Some(11.9), Some(17.0), Some(143.0)),
            record("Andhra Pradesh", Some(24.0), Some(7.0), Some(29.0)),
            record("Arunachal Pradesh", Some(3.5), None, None),
            record("Haryana", Some(9.1), Some(12.5), Some(137.0)),
        ])
    }

    #[test]
    fn test_summary() {
        let summary = snapshot().summary();
        assert_relative_eq!(summary.total_availability.unwrap(), 67.3, epsilon = 1e-9);
        assert_relative_eq!(summary.total_extraction.unwrap(), 64.5, epsilon = 1e-9);
        assert_relative_eq!(summary.extraction_stage_avg.unwrap(), 114.5);
        assert_eq!(summary.critical_states_count, 3);
        assert_eq!(summary.states[2].status, StateStatus::Ok);
        assert_eq!(summary.states[3].status, StateStatus::Ok);
    }

    #[test]
    fn test_empty_summary() {
        let summary = GroundwaterSnapshot::default().summary();
        assert_eq!(summary.total_availability, None);
        assert_eq!(summary.extraction_stage_avg, None);
        assert_eq!(summary.critical_states_count, 0);
    }

    #[test]
    fn test_top_n_skips_missing() {
        let top = snapshot().top_n(Metric::Extraction, 10);
        assert_eq!(top.len(), 4);
        assert_eq!(top[0].state, "Punjab");
        assert_eq!(top[3].state, "Andhra Pradesh");

        let top = snapshot().top_n(Metric::Stage, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[1].state, "Rajasthan");
    }

    #[test]
    fn test_find_state() {
        let snap = snapshot();
        assert_eq!(snap.find_state("PUNJAB").unwrap().state, "Punjab");
        // Substring match takes the first in snapshot order
        assert_eq!(snap.find_state("pradesh").unwrap().state, "Andhra Pradesh");
        assert_eq!(
            snap.find_state("Kerala"),
            Err(AdvisorError::UnknownState("Kerala".to_string()))
        );
        assert!(snap.find_state("  ").is_err());
    }

    #[test]
    fn test_aggregate_aliases() {
        let snap = snapshot();
        for alias in ["All States", "all_states", "All States (Aggregate)", "ALL_STATES_AGGREGATE"] {
            let agg = snap.resolve(alias).unwrap();
            assert_eq!(agg.state, AGGREGATE_LABEL);
        }
        let agg = snap.aggregate();
        assert_relative_eq!(agg.stage.unwrap(), 64.5 / 67.3 * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!(Metric::parse(" Stage ").unwrap(), Metric::Stage);
        assert!(Metric::parse("depth").unwrap_err().is_validation());
    }

    #[test]
    fn test_effective_stage() {
        let r = record("X", Some(10.0), Some(8.0), None);
        assert_relative_eq!(r.effective_stage().unwrap(), 80.0);
        assert_eq!(record("Y", Some(0.0), Some(1.0), None).effective_stage(), None);
    }
}
