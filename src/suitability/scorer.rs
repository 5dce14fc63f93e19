//! Crop Suitability Scorer
//!
//! Weighted multi-factor score of how well a crop template fits an
//! environmental input:
//!
//! | Factor      | Weight | Margin outside range       |
//! |-------------|--------|----------------------------|
//! | Temperature | 30     | 5 °C                       |
//! | Rainfall    | 25     | 50% of the range width     |
//! | Soil        | 20     | match table (never zero)   |
//! | Sunshine    | 15     | 3 h, only when measured    |
//! | Market      | 10     | High 10 / Medium 6 / Low 3 |
//!
//! When sunshine is not measured its 15 points are dropped, not redistributed,
//! so the best reachable score is 85.

use rayon::prelude::*;

use super::assessment::{Factor, FactorBand, FactorNote, SuitabilityRating, SuitabilityResult};
use super::comparator::{compare_to_range, RangeComparison};
use crate::catalog::{CropTemplate, SoilMatch};
use crate::input::EnvironmentalInput;

pub const TEMPERATURE_WEIGHT: f64 = 30.0;
pub const RAINFALL_WEIGHT: f64 = 25.0;
pub const SOIL_WEIGHT: f64 = 20.0;
pub const SUNSHINE_WEIGHT: f64 = 15.0;
pub const MARKET_WEIGHT: f64 = 10.0;

pub const TEMPERATURE_MARGIN_C: f64 = 5.0;
pub const RAINFALL_MARGIN_FRACTION: f64 = 0.5;
pub const SUNSHINE_MARGIN_H: f64 = 3.0;

/// Number of crops returned by `rank_crops`
pub const DEFAULT_TOP_N: usize = 3;

/// Score one crop template against an environmental input
pub fn score_crop(template: &CropTemplate, input: &EnvironmentalInput) -> SuitabilityResult {
    let mut path = Vec::with_capacity(5);

    let temperature = compare_to_range(input.temperature_c, &template.temperature);
    path.push(range_note(
        Factor::Temperature,
        &temperature,
        TEMPERATURE_WEIGHT,
        TEMPERATURE_MARGIN_C,
        " °C",
    ));

    let rainfall = compare_to_range(input.rainfall_mm, &template.rainfall);
    path.push(range_note(
        Factor::Rainfall,
        &rainfall,
        RAINFALL_WEIGHT,
        template.rainfall.width() * RAINFALL_MARGIN_FRACTION,
        " mm",
    ));

    path.push(soil_note(template, input));

    if let Some(sunshine_hours) = input.sunshine_hours {
        let sunshine = compare_to_range(sunshine_hours, &template.sunshine);
        path.push(range_note(
            Factor::Sunshine,
            &sunshine,
            SUNSHINE_WEIGHT,
            SUNSHINE_MARGIN_H,
            " h",
        ));
    }

    let bonus = template.market_value.bonus();
    path.push(FactorNote {
        factor: Factor::Market,
        band: match bonus {
            b if b >= MARKET_WEIGHT => FactorBand::Optimal,
            b if b >= MARKET_WEIGHT * 0.5 => FactorBand::Acceptable,
            _ => FactorBand::Marginal,
        },
        points: bonus,
        max_points: MARKET_WEIGHT,
        note: format!("{:?} market value", template.market_value),
    });

    let total: f64 = path.iter().map(|n| n.points).sum();
    let score = ((total * 10.0).round() / 10.0).clamp(0.0, 100.0);
    let rating = SuitabilityRating::from_score(score);

    let mut result = SuitabilityResult {
        crop: template.kind,
        crop_name: template.name.clone(),
        score,
        rating,
        explanation: String::new(),
        decision_path: path,
    };
    result.explanation = explain(&result);
    result
}

/// Rank templates by score, best first, returning at most three
pub fn rank_crops(templates: &[CropTemplate], input: &EnvironmentalInput) -> Vec<SuitabilityResult> {
    rank_crops_top(templates, input, DEFAULT_TOP_N)
}

/// Rank templates by score, best first, returning at most `n`.
///
/// Equal scores keep the order in which templates were supplied.
pub fn rank_crops_top(
    templates: &[CropTemplate],
    input: &EnvironmentalInput,
    n: usize,
) -> Vec<SuitabilityResult> {
    let mut results = score_all(templates, input);
    // Stable: ties stay in input order
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(n);
    results
}

/// Score every template, in template order
pub fn score_all(templates: &[CropTemplate], input: &EnvironmentalInput) -> Vec<SuitabilityResult> {
    templates
        .par_iter()
        .map(|template| score_crop(template, input))
        .collect()
}

fn range_note(
    factor: Factor,
    comparison: &RangeComparison,
    weight: f64,
    margin: f64,
    unit: &str,
) -> FactorNote {
    let band = if comparison.is_within_range() {
        FactorBand::Optimal
    } else if comparison.is_beyond(margin) {
        FactorBand::Unsuitable
    } else {
        FactorBand::Marginal
    };

    FactorNote {
        factor,
        band,
        points: comparison.points(weight, margin),
        max_points: weight,
        note: format!(
            "{} {}",
            comparison.format_with_context(unit),
            comparison.fit.display_text()
        ),
    }
}

fn soil_note(template: &CropTemplate, input: &EnvironmentalInput) -> FactorNote {
    let soil_match = input.soil_type.match_against(&template.soils);
    let band = match soil_match {
        SoilMatch::Exact => FactorBand::Optimal,
        SoilMatch::Partial => FactorBand::Acceptable,
        SoilMatch::Adjacent => FactorBand::Marginal,
        SoilMatch::Incompatible => FactorBand::Unsuitable,
    };

    let accepted = template
        .soils
        .iter()
        .map(|s| s.display_name())
        .collect::<Vec<_>>()
        .join(", ");

    FactorNote {
        factor: Factor::Soil,
        band,
        points: SOIL_WEIGHT * soil_match.multiplier(),
        max_points: SOIL_WEIGHT,
        note: format!(
            "{} soil: {} (grown on {})",
            input.soil_type,
            soil_match.display_text(),
            accepted
        ),
    }
}

fn explain(result: &SuitabilityResult) -> String {
    let mut text = format!(
        "{} for {} ({:.1}/100).",
        result.rating.display_text(),
        result.crop_name,
        result.score
    );

    match result.weakest_factor() {
        Some(weakest) if weakest.band != FactorBand::Optimal => {
            text.push_str(&format!(
                " Main limitation: {} ({}).",
                weakest.factor.display_name().to_lowercase(),
                weakest.band.display_text().to_lowercase()
            ));
        }
        _ => text.push_str(" All measured conditions are within the optimal range."),
    }

    if result.note(Factor::Sunshine).is_none() {
        text.push_str(" Sunshine not measured; score is out of 85.");
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CropCatalog, CropKind, SoilType};
    use crate::config::InputDefaults;
    use crate::input::FieldObservation;
    use approx::assert_relative_eq;

    fn input(soil: &str, rainfall: f64, temperature: f64, sunshine: Option<f64>) -> EnvironmentalInput {
        let mut obs = FieldObservation::new(soil, rainfall, temperature);
        obs.sunshine_hours = sunshine;
        EnvironmentalInput::from_observation(&obs, &InputDefaults::default()).unwrap()
    }

    fn rice() -> &'static CropTemplate {
        CropCatalog::standard().get(CropKind::Rice).unwrap()
    }

    #[test]
    fn test_rice_on_loamy_is_optimal() {
        let result = score_crop(rice(), &input("Loamy", 1200.0, 27.0, Some(9.0)));

        for factor in [Factor::Temperature, Factor::Rainfall, Factor::Soil, Factor::Sunshine] {
            assert_eq!(result.note(factor).unwrap().band, FactorBand::Optimal, "{:?}", factor);
        }
        assert!(result.score >= 90.0, "score {}", result.score);
        assert_relative_eq!(result.score, 93.9);
        assert_eq!(result.rating, SuitabilityRating::HighlySuitable);
    }

    #[test]
    fn test_missing_sunshine_caps_score() {
        let result = score_crop(rice(), &input("Loamy", 1750.0, 27.5, None));
        assert!(result.note(Factor::Sunshine).is_none());
        assert_relative_eq!(result.max_attainable(), 85.0);
        assert_relative_eq!(result.score, 85.0);
        assert!(result.explanation.contains("out of 85"));
    }

    #[test]
    fn test_far_outside_scores_zero_factor() {
        let result = score_crop(rice(), &input("Desert", 100.0, 5.0, Some(2.0)));
        assert_eq!(result.note(Factor::Temperature).unwrap().points, 0.0);
        assert_eq!(result.note(Factor::Temperature).unwrap().band, FactorBand::Unsuitable);
        // Soil never drops to zero
        assert_relative_eq!(result.note(Factor::Soil).unwrap().points, 4.0);
        assert!(result.score >= 0.0);
        assert!(result.explanation.contains("Main limitation"));
    }

    #[test]
    fn test_score_bounds_over_grid() {
        let catalog = CropCatalog::standard();
        for soil in ["Loamy", "Clay", "Sandy Loam", "Red", "Volcanic"] {
            for rainfall in [0.0, 300.0, 900.0, 2000.0, 6000.0] {
                for temperature in [-10.0, 12.0, 26.0, 40.0] {
                    for sunshine in [None, Some(0.0), Some(9.0), Some(24.0)] {
                        let env = input(soil, rainfall, temperature, sunshine);
                        for template in catalog.templates() {
                            let score = score_crop(template, &env).score;
                            assert!((0.0..=100.0).contains(&score));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_rank_crops_order_and_size() {
        let env = input("Loamy", 1200.0, 27.0, Some(9.0));
        let ranked = rank_crops(CropCatalog::standard().templates(), &env);

        assert_eq!(ranked.len(), 3);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(ranked[0].crop, CropKind::Rice);
    }

    #[test]
    fn test_rank_with_fewer_templates() {
        let env = input("Loamy", 1200.0, 27.0, None);
        let templates: Vec<CropTemplate> = CropCatalog::standard().templates()[..2].to_vec();
        assert_eq!(rank_crops(&templates, &env).len(), 2);
        assert!(rank_crops(&[], &env).is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let env = input("Loamy", 1200.0, 27.0, Some(9.0));
        let mut first = rice().clone();
        first.name = "Rice A".into();
        let mut second = rice().clone();
        second.name = "Rice B".into();

        let ranked = rank_crops(&[first, second], &env);
        assert_eq!(ranked[0].crop_name, "Rice A");
        assert_eq!(ranked[1].crop_name, "Rice B");
        assert_eq!(ranked[0].score, ranked[1].score);
    }

    #[test]
    fn test_soil_partial_and_adjacent_points() {
        let env = input("Sandy Loam", 1200.0, 27.0, None);
        let note = score_crop(rice(), &env).note(Factor::Soil).cloned().unwrap();
        assert_eq!(note.band, FactorBand::Acceptable);
        assert_relative_eq!(note.points, 14.0);

        let env = input("Silt", 1200.0, 27.0, None);
        let note = score_crop(rice(), &env).note(Factor::Soil).cloned().unwrap();
        assert_eq!(note.band, FactorBand::Marginal);
        assert_relative_eq!(note.points, 10.0);
        assert_eq!(env.soil_type, SoilType::Silt);
    }
}
