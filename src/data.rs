//! Data Loading
//!
//! Reads the groundwater snapshot and commodity price CSVs with Polars.
//!
//! Expected columns:
//! - groundwater: `state,availability,extraction,stage`
//! - prices: `commodity,date,price` (ISO dates)
//! - groundwater history: `state,year,value` (one row per state and year)
//!
//! Rows without a state, commodity, valid date or price are skipped. Missing
//! groundwater values are kept as gaps.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use polars::prelude::*;

use crate::groundwater::{GroundwaterHistory, GroundwaterSnapshot, HistoryRow, StateRecord};
use crate::market::{PriceBook, PricePoint};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to load CSV: {}", path.display()))
}

fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", name))?;
    Ok(column
        .f64()
        .with_context(|| format!("Column '{}' is not numeric", name))?
        .clone())
}

fn int_column(df: &DataFrame, name: &str) -> Result<Int64Chunked> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Int64)
        .with_context(|| format!("Column '{}' is not an integer", name))?;
    Ok(column
        .i64()
        .with_context(|| format!("Column '{}' is not an integer", name))?
        .clone())
}

fn string_column(df: &DataFrame, name: &str) -> Result<StringChunked> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::String)
        .with_context(|| format!("Column '{}' is not text", name))?;
    Ok(column
        .str()
        .with_context(|| format!("Column '{}' is not text", name))?
        .clone())
}

/// Load a per-state groundwater snapshot
pub fn load_groundwater_snapshot(path: impl AsRef<Path>) -> Result<GroundwaterSnapshot> {
    let path = path.as_ref();
    let df = read_csv(path)?;

    let states = string_column(&df, "state")?;
    let availability = float_column(&df, "availability")?;
    let extraction = float_column(&df, "extraction")?;
    let stage = float_column(&df, "stage")?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let state = match states.get(idx).map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                tracing::debug!("Skipping groundwater row {}: no state", idx);
                continue;
            }
        };
        records.push(StateRecord {
            state,
            availability: availability.get(idx).filter(|v| v.is_finite()),
            extraction: extraction.get(idx).filter(|v| v.is_finite()),
            stage: stage.get(idx).filter(|v| v.is_finite()),
        });
    }

    tracing::info!("Loaded {} groundwater states from {}", records.len(), path.display());
    Ok(GroundwaterSnapshot::new(records))
}

/// Load long-format yearly groundwater history
pub fn load_groundwater_history(path: impl AsRef<Path>) -> Result<GroundwaterHistory> {
    let path = path.as_ref();
    let df = read_csv(path)?;

    let states = string_column(&df, "state")?;
    let years = int_column(&df, "year")?;
    let values = float_column(&df, "value")?;

    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let state = states.get(idx).map(str::trim).filter(|s| !s.is_empty());
        let year = years.get(idx).and_then(|y| i32::try_from(y).ok());
        match (state, year) {
            (Some(state), Some(year)) => rows.push(HistoryRow {
                state: state.to_string(),
                year,
                value: values.get(idx).filter(|v| v.is_finite()),
            }),
            _ => tracing::debug!("Skipping history row {}: no state or year", idx),
        }
    }

    let history = GroundwaterHistory::new(rows);
    tracing::info!(
        "Loaded {} history rows for {} states from {}",
        history.len(),
        history.states().len(),
        path.display()
    );
    Ok(history)
}

/// Load commodity price histories
pub fn load_price_book(path: impl AsRef<Path>) -> Result<PriceBook> {
    let path = path.as_ref();
    let df = read_csv(path)?;

    let commodities = string_column(&df, "commodity")?;
    let dates = string_column(&df, "date")?;
    let prices = float_column(&df, "price")?;

    let mut book = PriceBook::new();
    let mut skipped = 0usize;
    for idx in 0..df.height() {
        let commodity = commodities.get(idx).map(str::trim).filter(|c| !c.is_empty());
        let date = dates
            .get(idx)
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), DATE_FORMAT).ok());
        let price = prices.get(idx).filter(|p| p.is_finite() && *p >= 0.0);

        match (commodity, date, price) {
            (Some(commodity), Some(date), Some(price)) => {
                book.insert(commodity, PricePoint { date, price });
            }
            _ => {
                skipped += 1;
                tracing::debug!("Skipping price row {}", idx);
            }
        }
    }

    tracing::info!(
        "Loaded {} commodities from {} ({} rows skipped)",
        book.len(),
        path.display(),
        skipped
    );
    Ok(book)
}
