//! Five-Year Groundwater Projection
//!
//! Compound growth from a single snapshot year. The growth rates depend on how
//! stressed the state already is:
//!
//! | Stage of extraction | Availability | Utilization | Extraction |
//! |---------------------|--------------|-------------|------------|
//! | > 70 %              | -2 %         | +3 %        | +3 %       |
//! | 40-70 %             | -1 %         | +1.5 %      | +2 %       |
//! | <= 40 %             | +1 %         | +0.5 %      | +1 %       |
//!
//! Utilization is the projected stage of extraction. The confidence band widens
//! linearly from ±10 % in year 1 to ±25 % in year 5.

use serde::{Deserialize, Serialize};

use super::snapshot::StateRecord;
use crate::error::{AdvisorError, AdvisorResult};

pub const PROJECTION_YEARS: u32 = 5;
pub const DEFAULT_BASE_YEAR: i32 = 2024;
/// Accepted base years, inclusive
pub const BASE_YEAR_RANGE: (i32, i32) = (1900, 2200);

const BAND_START_PCT: f64 = 10.0;
const BAND_END_PCT: f64 = 25.0;
const TREND_THRESHOLD: f64 = 0.05;

/// Annual growth rates applied to one state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRates {
    pub availability: f64,
    pub utilization: f64,
    pub extraction: f64,
}

impl GrowthRates {
    pub fn for_stage(stage_pct: f64) -> Self {
        if stage_pct > 70.0 {
            GrowthRates {
                availability: -0.02,
                utilization: 0.03,
                extraction: 0.03,
            }
        } else if stage_pct > 40.0 {
            GrowthRates {
                availability: -0.01,
                utilization: 0.015,
                extraction: 0.02,
            }
        } else {
            GrowthRates {
                availability: 0.01,
                utilization: 0.005,
                extraction: 0.01,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Safe,
    SemiCritical,
    Critical,
    OverExploited,
}

impl RiskLevel {
    pub fn classify(stage_pct: f64) -> Self {
        if stage_pct > 100.0 {
            RiskLevel::OverExploited
        } else if stage_pct > 90.0 {
            RiskLevel::Critical
        } else if stage_pct > 70.0 {
            RiskLevel::SemiCritical
        } else {
            RiskLevel::Safe
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::SemiCritical => "Semi-critical",
            RiskLevel::Critical => "Critical",
            RiskLevel::OverExploited => "Over-exploited",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionTrend {
    Rising,
    Stable,
    Falling,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedYear {
    pub year: i32,
    pub availability: f64,
    pub utilization_pct: f64,
    pub extraction: f64,
    /// Half-width of the confidence band (%), 0 for the baseline year
    pub band_pct: f64,
    pub extraction_low: f64,
    pub extraction_high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundwaterProjection {
    pub state: String,
    pub base_year: i32,
    pub rates: GrowthRates,
    /// Baseline year followed by five projected years
    pub years: Vec<ProjectedYear>,
    pub risk: RiskLevel,
    pub trend: ExtractionTrend,
}

impl GroundwaterProjection {
    pub fn baseline(&self) -> &ProjectedYear {
        &self.years[0]
    }

    pub fn final_year(&self) -> &ProjectedYear {
        &self.years[self.years.len() - 1]
    }
}

/// Confidence band half-width (%) for a year offset
pub fn band_pct(offset: u32) -> f64 {
    if offset == 0 {
        return 0.0;
    }
    let step = (BAND_END_PCT - BAND_START_PCT) / f64::from(PROJECTION_YEARS - 1);
    BAND_START_PCT + step * f64::from(offset - 1)
}

/// Reject base years outside `BASE_YEAR_RANGE`
pub fn check_base_year(base_year: i32) -> AdvisorResult<i32> {
    let (min, max) = BASE_YEAR_RANGE;
    if (min..=max).contains(&base_year) {
        Ok(base_year)
    } else {
        Err(AdvisorError::invalid("base_year", base_year, "must be within [1900, 2200]"))
    }
}

/// Calendar year `offset` years after `base_year`
pub fn year_after(base_year: i32, offset: u32) -> AdvisorResult<i32> {
    i32::try_from(offset)
        .ok()
        .and_then(|offset| base_year.checked_add(offset))
        .ok_or_else(|| AdvisorError::invalid("base_year", base_year, "year out of range"))
}

/// Project a state's groundwater balance five years ahead
pub fn project_groundwater(record: &StateRecord, base_year: i32) -> AdvisorResult<GroundwaterProjection> {
    let base_year = check_base_year(base_year)?;
    let availability = record
        .availability
        .ok_or(AdvisorError::MissingField { field: "availability" })?;
    let extraction = record
        .extraction
        .ok_or(AdvisorError::MissingField { field: "extraction" })?;
    let stage = record
        .effective_stage()
        .ok_or(AdvisorError::MissingField { field: "stage" })?;

    let rates = GrowthRates::for_stage(stage);
    let years = (0..=PROJECTION_YEARS)
        .map(|offset| -> AdvisorResult<ProjectedYear> {
            let exp = offset as i32;
            let projected_extraction = extraction * (1.0 + rates.extraction).powi(exp);
            let band = band_pct(offset);
            Ok(ProjectedYear {
                year: year_after(base_year, offset)?,
                availability: availability * (1.0 + rates.availability).powi(exp),
                utilization_pct: stage * (1.0 + rates.utilization).powi(exp),
                extraction: projected_extraction,
                band_pct: band,
                extraction_low: projected_extraction * (1.0 - band / 100.0),
                extraction_high: projected_extraction * (1.0 + band / 100.0),
            })
        })
        .collect::<AdvisorResult<Vec<ProjectedYear>>>()?;

    let last = &years[years.len() - 1];
    let risk = RiskLevel::classify(last.utilization_pct);
    let trend = if extraction <= 0.0 {
        ExtractionTrend::Stable
    } else {
        let change = (last.extraction - extraction) / extraction;
        if change > TREND_THRESHOLD {
            ExtractionTrend::Rising
        } else if change < -TREND_THRESHOLD {
            ExtractionTrend::Falling
        } else {
            ExtractionTrend::Stable
        }
    };

    Ok(GroundwaterProjection {
        state: record.state.clone(),
        base_year,
        rates,
        years,
        risk,
        trend,
    })
}
