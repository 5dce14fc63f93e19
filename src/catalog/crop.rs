//! Crop Identity and Templates
//!
//! `CropKind` is the normalized key for every crop-indexed table in the crate
//! (templates, crop coefficients, base yields). Free-text crop names are
//! resolved against a fixed alias list instead of substring search.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::soil::{normalize_key, SoilType};

/// Crops known to the advisory tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CropKind {
    Rice,
    Wheat,
    Maize,
    Cotton,
    Sugarcane,
    Soybean,
    Groundnut,
    Chickpea,
    Potato,
    Tomato,
    Millet,
    Mustard,
}

impl CropKind {
    /// Resolve a crop name or common alias. Returns `None` for unknown crops.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize_key(raw);
        let key = key.strip_suffix(" crop").unwrap_or(key.as_str()).trim();

        let kind = match key {
            "rice" | "paddy" | "basmati" | "basmati rice" => CropKind::Rice,
            "wheat" => CropKind::Wheat,
            "maize" | "corn" => CropKind::Maize,
            "cotton" => CropKind::Cotton,
            "sugarcane" | "sugar cane" => CropKind::Sugarcane,
            "soybean" | "soybeans" | "soya" | "soya bean" => CropKind::Soybean,
            "groundnut" | "peanut" | "groundnuts" => CropKind::Groundnut,
            "chickpea" | "chickpeas" | "gram" | "chana" => CropKind::Chickpea,
            "potato" | "potatoes" => CropKind::Potato,
            "tomato" | "tomatoes" => CropKind::Tomato,
            "millet" | "bajra" | "pearl millet" | "jowar" | "sorghum" => CropKind::Millet,
            "mustard" | "rapeseed" | "rapeseed mustard" => CropKind::Mustard,
            _ => return None,
        };

        Some(kind)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CropKind::Rice => "Rice",
            CropKind::Wheat => "Wheat",
            CropKind::Maize => "Maize",
            CropKind::Cotton => "Cotton",
            CropKind::Sugarcane => "Sugarcane",
            CropKind::Soybean => "Soybean",
            CropKind::Groundnut => "Groundnut",
            CropKind::Chickpea => "Chickpea",
            CropKind::Potato => "Potato",
            CropKind::Tomato => "Tomato",
            CropKind::Millet => "Millet",
            CropKind::Mustard => "Mustard",
        }
    }

    pub fn all() -> &'static [CropKind] {
        &[
            CropKind::Rice,
            CropKind::Wheat,
            CropKind::Maize,
            CropKind::Cotton,
            CropKind::Sugarcane,
            CropKind::Soybean,
            CropKind::Groundnut,
            CropKind::Chickpea,
            CropKind::Potato,
            CropKind::Tomato,
            CropKind::Millet,
            CropKind::Mustard,
        ]
    }
}

impl fmt::Display for CropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Seasonal water demand class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterRequirement {
    Low,
    Medium,
    High,
}

/// Market value class, feeds the suitability bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketValue {
    Low,
    Medium,
    High,
}

impl MarketValue {
    /// Bonus points out of the 10-point market weight
    pub fn bonus(&self) -> f64 {
        match self {
            MarketValue::High => 10.0,
            MarketValue::Medium => 6.0,
            MarketValue::Low => 3.0,
        }
    }
}

/// Closed interval of optimal values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalRange {
    pub min: f64,
    pub max: f64,
}

impl OptimalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn half_width(&self) -> f64 {
        (self.max - self.min) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

impl fmt::Display for OptimalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Immutable reference record describing where a crop does well
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropTemplate {
    pub kind: CropKind,
    pub name: String,
    /// Optimal mean growing-season temperature (°C)
    pub temperature: OptimalRange,
    /// Optimal annual rainfall (mm)
    pub rainfall: OptimalRange,
    /// Soils the crop is commonly grown on
    pub soils: Vec<SoilType>,
    /// Optimal daily sunshine (hours)
    pub sunshine: OptimalRange,
    /// Typical yield under good management (tons/ha)
    pub base_yield_t_ha: f64,
    /// Sowing to harvest (days)
    pub growth_days: u32,
    pub water_requirement: WaterRequirement,
    pub market_value: MarketValue,
}
