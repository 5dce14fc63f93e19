//! Field Advisory
//!
//! Runs crop ranking, irrigation and yield for one field and formats the
//! combined result as markdown.
//!
//! The focus crop is the one the caller named, otherwise the best-ranked crop.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::AdvisorContext;
use crate::error::AdvisorResult;
use crate::input::{EnvironmentalInput, FieldObservation};
use crate::irrigation::{assess_irrigation, IrrigationRecommendation};
use crate::suitability::{rank_crops, SuitabilityResult};
use crate::yield_forecast::{forecast_yield, Polarity, YieldForecast, YieldInputs};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub location: String,
    pub recommended_crops: Vec<SuitabilityResult>,
    pub focus_crop: Option<String>,
    pub irrigation: IrrigationRecommendation,
    pub yield_forecast: Option<YieldForecast>,
}

/// Advisory for a validated input
pub fn build_advisory(ctx: &AdvisorContext, input: &EnvironmentalInput, today: NaiveDate) -> Advisory {
    let recommended_crops = rank_crops(ctx.catalog.templates(), input);

    let focus_kind = input.crop.or_else(|| recommended_crops.first().map(|r| r.crop));
    let focus_crop = focus_kind.map(|kind| {
        ctx.catalog
            .get(kind)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| kind.display_name().to_string())
    });

    let mut field = input.clone();
    field.crop = focus_kind;
    let irrigation = assess_irrigation(&field, today);

    let weather = field.weather();
    let yield_forecast = focus_crop.as_deref().map(|crop| {
        let inputs = YieldInputs::from_input(crop, &field, &irrigation, &weather);
        forecast_yield(&ctx.catalog, &inputs)
    });

    Advisory {
        location: input.location.clone(),
        recommended_crops,
        focus_crop,
        irrigation,
        yield_forecast,
    }
}

/// Validate a raw observation, then build its advisory
pub fn advise(ctx: &AdvisorContext, observation: &FieldObservation, today: NaiveDate) -> AdvisorResult<Advisory> {
    let input = EnvironmentalInput::from_observation(observation, &ctx.defaults)?;
    Ok(build_advisory(ctx, &input, today))
}

pub fn render_markdown(advisory: &Advisory) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str(&format!("# Field Advisory: {}\n\n", advisory.location));

    md.push_str("## Recommended Crops\n\n");
    if advisory.recommended_crops.is_empty() {
        md.push_str("No crop templates available.\n\n");
    }
    for (rank, result) in advisory.recommended_crops.iter().enumerate() {
        md.push_str(&format!(
            "### {}. {} ({:.1}/100, {})\n\n",
            rank + 1,
            result.crop_name,
            result.score,
            result.rating.display_text()
        ));
        md.push_str(&format!("{}\n\n", result.explanation));
        for note in &result.decision_path {
            md.push_str(&format!(
                "- **{}** {:.1}/{:.0}: {}\n",
                note.factor.display_name(),
                note.points,
                note.max_points,
                note.note
            ));
        }
        md.push('\n');
    }

    let irrigation = &advisory.irrigation;
    md.push_str("## Irrigation\n\n");
    match irrigation.urgency {
        Some(urgency) => md.push_str(&format!(
            "**{} urgency:** apply {:.1} mm by {}.\n\n",
            urgency, irrigation.water_amount_mm, irrigation.next_irrigation
        )),
        None => md.push_str(&format!(
            "No irrigation needed. Check again on {}.\n\n",
            irrigation.next_irrigation
        )),
    }
    md.push_str(&format!("{}\n\n", irrigation.reason));
    for adjustment in &irrigation.adjustments {
        md.push_str(&format!("- {}\n", adjustment));
    }
    md.push_str(&format!(
        "*Confidence:* {:.0}% (ET0 {:.2} mm/day, Kc {:.2})\n\n",
        irrigation.confidence, irrigation.evapotranspiration.et0_mm_day, irrigation.crop_coefficient
    ));

    if let Some(forecast) = &advisory.yield_forecast {
        md.push_str(&format!("## Yield Forecast: {}\n\n", forecast.crop_name));
        md.push_str(&format!(
            "**{:.2} t/ha** (base {:.2} t/ha, confidence {:.0}%)\n\n",
            forecast.predicted_yield_t_ha, forecast.base_yield_t_ha, forecast.confidence
        ));
        for factor in &forecast.factors {
            let sign = match factor.polarity {
                Polarity::Positive => "+",
                Polarity::Negative => "-",
            };
            md.push_str(&format!(
                "- ({}) {}: {}\n",
                sign, factor.factor, factor.description
            ));
        }
        md.push_str("\n### Recommendations\n\n");
        for rec in &forecast.recommendations {
            md.push_str(&format!("- {}\n", rec));
        }
    }

    md
}
