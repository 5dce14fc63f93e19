//! Short-Horizon Price Forecast
//!
//! Ordinary least squares over the price history (x = 0..n-1) extrapolated
//! one to three days past the last observation. Confidence decays with the
//! horizon and with the series' volatility (stdev / mean).

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const FORECAST_DAYS: u32 = 3;

const BASE_CONFIDENCE: f64 = 0.85;
const CONFIDENCE_DECAY_PER_DAY: f64 = 0.15;
const VOLATILITY_PENALTY: f64 = 0.1;
const MIN_CONFIDENCE: f64 = 0.3;
const SINGLE_POINT_CONFIDENCE: [f64; 3] = [0.5, 0.4, 0.3];
const TREND_THRESHOLD: f64 = 0.02;
const SMOOTHING_ALPHA: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Up,
    Down,
    Stable,
}

impl PriceTrend {
    /// Classify a change against 2% of the reference price
    pub fn classify(change: f64, reference: f64) -> Self {
        let threshold = reference.abs() * TREND_THRESHOLD;
        if change > threshold {
            PriceTrend::Up
        } else if change < -threshold {
            PriceTrend::Down
        } else {
            PriceTrend::Stable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePrediction {
    pub date: NaiveDate,
    pub predicted_price: f64,
    /// 0-1
    pub confidence: f64,
    pub trend: PriceTrend,
    /// Predicted price minus the last known price
    pub change: f64,
}

/// Fitted line plus smoothing diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOutlook {
    pub last_price: f64,
    pub slope: f64,
    pub intercept: f64,
    /// Simple exponential smoothing level
    pub smoothed_level: f64,
    pub volatility: f64,
    pub predictions: Vec<PricePrediction>,
}

/// Least-squares (slope, intercept) of `values` against their index
pub fn linear_fit(values: &[f64]) -> (f64, f64) {
    linear_fit_points(values.iter().enumerate().map(|(i, y)| (i as f64, *y)))
}

/// Least-squares (slope, intercept) over `(x, y)` points. A constant `x`
/// gives slope 0 through the mean.
pub fn linear_fit_points<I>(points: I) -> (f64, f64)
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let points: Vec<(f64, f64)> = points.into_iter().collect();
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (x, y) in &points {
        let dx = x - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    (slope, mean_y - slope * mean_x)
}

/// Population standard deviation over mean, 0 for a zero mean
pub fn volatility(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean.abs()
}

/// Simple exponential smoothing level
pub fn smoothed_level(values: &[f64], alpha: f64) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    Some(rest.iter().fold(*first, |level, v| alpha * v + (1.0 - alpha) * level))
}

/// Forecast the next three days of prices
pub fn predict_3day_prices(history: &[PricePoint]) -> Vec<PricePrediction> {
    price_outlook(history)
        .map(|outlook| outlook.predictions)
        .unwrap_or_default()
}

/// Forecast plus fit diagnostics, `None` for an empty history
pub fn price_outlook(history: &[PricePoint]) -> Option<PriceOutlook> {
    let mut ordered = history.to_vec();
    ordered.sort_by_key(|p| p.date);
    let last = *ordered.last()?;
    let prices: Vec<f64> = ordered.iter().map(|p| p.price).collect();

    if prices.len() < 2 {
        let predictions = (1..=FORECAST_DAYS)
            .zip(SINGLE_POINT_CONFIDENCE)
            .map(|(day, confidence)| PricePrediction {
                date: offset_date(last.date, day),
                predicted_price: last.price,
                confidence,
                trend: PriceTrend::Stable,
                change: 0.0,
            })
            .collect();

        return Some(PriceOutlook {
            last_price: last.price,
            slope: 0.0,
            intercept: last.price,
            smoothed_level: last.price,
            volatility: 0.0,
            predictions,
        });
    }

    let (slope, intercept) = linear_fit(&prices);
    let vol = volatility(&prices);
    let n = prices.len() as f64;

    let predictions = (1..=FORECAST_DAYS)
        .map(|day| {
            let predicted = (intercept + slope * (n - 1.0 + f64::from(day))).max(0.0);
            let change = predicted - last.price;
            let confidence = (BASE_CONFIDENCE
                - CONFIDENCE_DECAY_PER_DAY * f64::from(day)
                - VOLATILITY_PENALTY * vol)
                .max(MIN_CONFIDENCE);
            PricePrediction {
                date: offset_date(last.date, day),
                predicted_price: predicted,
                confidence,
                trend: PriceTrend::classify(change, last.price),
                change,
            }
        })
        .collect();

    Some(PriceOutlook {
        last_price: last.price,
        slope,
        intercept,
        smoothed_level: smoothed_level(&prices, SMOOTHING_ALPHA).unwrap_or(last.price),
        volatility: vol,
        predictions,
    })
}

fn offset_date(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days))).unwrap_or(date)
}
