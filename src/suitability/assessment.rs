//! Suitability Result Types
//!
//! Output structures for the crop suitability scorer. Each result keeps the
//! per-factor notes in evaluation order so a reader can follow the decision
//! path that produced the score.

use serde::{Deserialize, Serialize};

use crate::catalog::CropKind;

/// Scoring factors, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Factor {
    Temperature,
    Rainfall,
    Soil,
    Sunshine,
    Market,
}

impl Factor {
    pub fn display_name(&self) -> &'static str {
        match self {
            Factor::Temperature => "Temperature",
            Factor::Rainfall => "Rainfall",
            Factor::Soil => "Soil",
            Factor::Sunshine => "Sunshine",
            Factor::Market => "Market value",
        }
    }
}

/// Rating for an individual factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FactorBand {
    Optimal,
    Acceptable,
    Marginal,
    Unsuitable,
}

impl FactorBand {
    pub fn display_text(&self) -> &'static str {
        match self {
            FactorBand::Optimal => "Optimal",
            FactorBand::Acceptable => "Acceptable",
            FactorBand::Marginal => "Marginal",
            FactorBand::Unsuitable => "Unsuitable",
        }
    }
}

/// One step of the decision path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorNote {
    pub factor: Factor,
    pub band: FactorBand,
    pub points: f64,
    pub max_points: f64,
    pub note: String,
}

impl FactorNote {
    /// Share of the factor's weight that was earned
    pub fn ratio(&self) -> f64 {
        if self.max_points > 0.0 {
            self.points / self.max_points
        } else {
            0.0
        }
    }
}

/// Overall suitability label for a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SuitabilityRating {
    HighlySuitable,
    Suitable,
    ModeratelySuitable,
    PoorlySuitable,
}

impl SuitabilityRating {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => SuitabilityRating::HighlySuitable,
            s if s >= 60.0 => SuitabilityRating::Suitable,
            s if s >= 40.0 => SuitabilityRating::ModeratelySuitable,
            _ => SuitabilityRating::PoorlySuitable,
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            SuitabilityRating::HighlySuitable => "Highly suitable",
            SuitabilityRating::Suitable => "Suitable",
            SuitabilityRating::ModeratelySuitable => "Moderately suitable",
            SuitabilityRating::PoorlySuitable => "Poorly suitable",
        }
    }
}

/// Score of one crop template against one environmental input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityResult {
    pub crop: CropKind,
    pub crop_name: String,
    /// 0-100
    pub score: f64,
    pub rating: SuitabilityRating,
    pub explanation: String,
    pub decision_path: Vec<FactorNote>,
}

impl SuitabilityResult {
    pub fn note(&self, factor: Factor) -> Option<&FactorNote> {
        self.decision_path.iter().find(|n| n.factor == factor)
    }

    /// Lowest-ratio environmental factor (market excluded)
    pub fn weakest_factor(&self) -> Option<&FactorNote> {
        self.decision_path
            .iter()
            .filter(|n| n.factor != Factor::Market)
            .min_by(|a, b| a.ratio().total_cmp(&b.ratio()))
    }

    /// Largest score reachable with the factors that were evaluated
    pub fn max_attainable(&self) -> f64 {
        self.decision_path.iter().map(|n| n.max_points).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(factor: Factor, points: f64, max_points: f64) -> FactorNote {
        FactorNote {
            factor,
            band: FactorBand::Optimal,
            points,
            max_points,
            note: String::new(),
        }
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(SuitabilityRating::from_score(93.9), SuitabilityRating::HighlySuitable);
        assert_eq!(SuitabilityRating::from_score(60.0), SuitabilityRating::Suitable);
        assert_eq!(SuitabilityRating::from_score(45.0), SuitabilityRating::ModeratelySuitable);
        assert_eq!(SuitabilityRating::from_score(0.0), SuitabilityRating::PoorlySuitable);
    }

    #[test]
    fn test_weakest_factor_ignores_market() {
        let result = SuitabilityResult {
            crop: CropKind::Wheat,
            crop_name: "Wheat".into(),
            score: 70.0,
            rating: SuitabilityRating::Suitable,
            explanation: String::new(),
            decision_path: vec![
                note(Factor::Temperature, 27.0, 30.0),
                note(Factor::Rainfall, 10.0, 25.0),
                note(Factor::Soil, 20.0, 20.0),
                note(Factor::Market, 3.0, 10.0),
            ],
        };

        assert_eq!(result.weakest_factor().unwrap().factor, Factor::Rainfall);
        assert_eq!(result.max_attainable(), 85.0);
        assert!(result.note(Factor::Sunshine).is_none());
    }
}
