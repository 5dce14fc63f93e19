//! Price histories keyed by commodity

use rustc_hash::FxHashMap;

use super::price_forecast::PricePoint;
use crate::catalog::soil::normalize_key;

/// Date-ordered price series per commodity
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    series: FxHashMap<String, Vec<PricePoint>>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point, keeping the commodity's series sorted by date
    pub fn insert(&mut self, commodity: &str, point: PricePoint) {
        let entry = self.series.entry(normalize_key(commodity)).or_default();
        let pos = entry.partition_point(|p| p.date <= point.date);
        entry.insert(pos, point);
    }

    pub fn history(&self, commodity: &str) -> Option<&[PricePoint]> {
        self.series.get(&normalize_key(commodity)).map(Vec::as_slice)
    }

    /// Commodity keys, sorted
    pub fn commodities(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.series.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
