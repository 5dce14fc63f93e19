//! Commodity Prices
//!
//! ## Architecture
//! - `price_forecast.rs` - least-squares three-day forecast and outlook
//! - `price_book.rs` - per-commodity price histories

pub mod price_book;
pub mod price_forecast;

pub use price_book::PriceBook;
pub use price_forecast::{
    linear_fit, linear_fit_points, predict_3day_prices, price_outlook, volatility, PriceOutlook, PricePoint,
    PricePrediction, PriceTrend,
};
