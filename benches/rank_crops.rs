//! Criterion benchmarks for the scoring and forecasting engines.
//!
//! Benchmarks:
//!   - rank_crops over the standard catalog
//!   - assess_irrigation with estimated soil moisture
//!   - predict_3day_prices over a 90-day history
//!
//! Run with: cargo bench --bench rank_crops

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use farm_advisor::{
    assess_irrigation, predict_3day_prices, rank_crops, CropCatalog, EnvironmentalInput,
    FieldObservation, InputDefaults, PricePoint,
};

fn sample_input() -> EnvironmentalInput {
    let mut obs = FieldObservation::new("Loamy", 1200.0, 27.0);
    obs.sunshine_hours = Some(9.0);
    obs.crop = Some("Rice".into());
    EnvironmentalInput::from_observation(&obs, &InputDefaults::default()).unwrap()
}

// ---------------------------------------------------------------------------
// Benchmark: suitability ranking
// ---------------------------------------------------------------------------

fn bench_rank_crops(c: &mut Criterion) {
    let catalog = CropCatalog::standard();
    let input = sample_input();

    c.bench_function("rank_crops_standard_catalog", |b| {
        b.iter(|| black_box(rank_crops(black_box(catalog.templates()), black_box(&input))));
    });
}

// ---------------------------------------------------------------------------
// Benchmark: irrigation and prices
// ---------------------------------------------------------------------------

fn bench_irrigation(c: &mut Criterion) {
    let input = sample_input();
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    c.bench_function("assess_irrigation_estimated", |b| {
        b.iter(|| black_box(assess_irrigation(black_box(&input), today)));
    });
}

fn bench_price_forecast(c: &mut Criterion) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let history: Vec<PricePoint> = (0..90)
        .map(|day| PricePoint {
            date: start + Duration::days(day),
            price: 2000.0 + (day as f64) * 3.5 + ((day % 7) as f64) * 12.0,
        })
        .collect();

    c.bench_function("predict_3day_prices_90d", |b| {
        b.iter(|| black_box(predict_3day_prices(black_box(&history))));
    });
}

criterion_group!(benches, bench_rank_crops, bench_irrigation, bench_price_forecast);
criterion_main!(benches);
