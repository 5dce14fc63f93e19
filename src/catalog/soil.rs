//! Soil Type Normalization
//!
//! Maps free-text soil names onto a fixed enumeration and resolves how well a
//! field's soil matches the soils a crop is grown on. Matching is by explicit
//! key, texture components and a symmetric adjacency table, so the result
//! never depends on table iteration order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized soil classes used across the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    Alluvial,
    Loamy,
    SandyLoam,
    ClayLoam,
    SiltLoam,
    Clay,
    Sandy,
    Silt,
    /// Black cotton soil (regur)
    Black,
    Red,
    Laterite,
    Saline,
    Peaty,
    Desert,
    /// Unrecognized soil, stored as its normalized text
    Other(String),
}

/// How a field soil relates to a crop's accepted soils
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SoilMatch {
    /// No relation at all
    Incompatible,
    /// Listed together in the adjacency table
    Adjacent,
    /// Shares a texture component (e.g. sandy loam vs loamy)
    Partial,
    /// Same soil class
    Exact,
}

impl SoilMatch {
    /// Fraction of the soil weight awarded for this match
    pub fn multiplier(&self) -> f64 {
        match self {
            SoilMatch::Exact => 1.0,
            SoilMatch::Partial => 0.7,
            SoilMatch::Adjacent => 0.5,
            SoilMatch::Incompatible => 0.2,
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            SoilMatch::Exact => "exact soil match",
            SoilMatch::Partial => "partial soil match",
            SoilMatch::Adjacent => "compatible soil",
            SoilMatch::Incompatible => "unsuited soil",
        }
    }
}

/// Symmetric soil adjacency pairs
const ADJACENT_SOILS: &[(SoilType, SoilType)] = &[
    (SoilType::Alluvial, SoilType::Loamy),
    (SoilType::Alluvial, SoilType::Silt),
    (SoilType::Black, SoilType::Clay),
    (SoilType::Red, SoilType::Laterite),
    (SoilType::Red, SoilType::Sandy),
    (SoilType::Loamy, SoilType::Silt),
    (SoilType::Desert, SoilType::Sandy),
    (SoilType::Saline, SoilType::Alluvial),
    (SoilType::Peaty, SoilType::Clay),
];

const SANDY_LOAM_PARTS: &[SoilType] = &[SoilType::Sandy, SoilType::Loamy];
const CLAY_LOAM_PARTS: &[SoilType] = &[SoilType::Clay, SoilType::Loamy];
const SILT_LOAM_PARTS: &[SoilType] = &[SoilType::Silt, SoilType::Loamy];
const NO_PARTS: &[SoilType] = &[];

impl SoilType {
    /// Parse a soil name. Never fails: unknown names become `Other`.
    pub fn parse(raw: &str) -> Self {
        let key = normalize_key(raw);
        let key = key.strip_suffix(" soil").unwrap_or(key.as_str()).trim();

        match key {
            "alluvial" | "alluvium" => SoilType::Alluvial,
            "loamy" | "loam" => SoilType::Loamy,
            "sandy loam" | "sandy loamy" => SoilType::SandyLoam,
            "clay loam" | "clayey loam" => SoilType::ClayLoam,
            "silt loam" | "silty loam" => SoilType::SiltLoam,
            "clay" | "clayey" => SoilType::Clay,
            "sandy" | "sand" => SoilType::Sandy,
            "silt" | "silty" => SoilType::Silt,
            "black" | "black cotton" | "regur" => SoilType::Black,
            "red" | "red loam" => SoilType::Red,
            "laterite" | "lateritic" => SoilType::Laterite,
            "saline" | "alkaline" | "saline alkaline" => SoilType::Saline,
            "peaty" | "peat" | "marshy" => SoilType::Peaty,
            "desert" | "arid" => SoilType::Desert,
            other => SoilType::Other(other.to_string()),
        }
    }

    /// Texture components used for partial matching
    fn components(&self) -> &'static [SoilType] {
        match self {
            SoilType::SandyLoam => SANDY_LOAM_PARTS,
            SoilType::ClayLoam => CLAY_LOAM_PARTS,
            SoilType::SiltLoam => SILT_LOAM_PARTS,
            _ => NO_PARTS,
        }
    }

    fn shares_component(&self, other: &SoilType) -> bool {
        let mine = self.components();
        let theirs = other.components();

        mine.contains(other)
            || theirs.contains(self)
            || mine.iter().any(|c| theirs.contains(c))
    }

    fn is_adjacent_to(&self, other: &SoilType) -> bool {
        ADJACENT_SOILS
            .iter()
            .any(|(a, b)| (a == self && b == other) || (a == other && b == self))
    }

    /// Best relation between this soil and any of `accepted`
    pub fn match_against(&self, accepted: &[SoilType]) -> SoilMatch {
        accepted
            .iter()
            .map(|soil| {
                if soil == self {
                    SoilMatch::Exact
                } else if self.shares_component(soil) {
                    SoilMatch::Partial
                } else if self.is_adjacent_to(soil) {
                    SoilMatch::Adjacent
                } else {
                    SoilMatch::Incompatible
                }
            })
            .max()
            .unwrap_or(SoilMatch::Incompatible)
    }

    pub fn display_name(&self) -> &str {
        match self {
            SoilType::Alluvial => "Alluvial",
            SoilType::Loamy => "Loamy",
            SoilType::SandyLoam => "Sandy Loam",
            SoilType::ClayLoam => "Clay Loam",
            SoilType::SiltLoam => "Silt Loam",
            SoilType::Clay => "Clay",
            SoilType::Sandy => "Sandy",
            SoilType::Silt => "Silt",
            SoilType::Black => "Black",
            SoilType::Red => "Red",
            SoilType::Laterite => "Laterite",
            SoilType::Saline => "Saline",
            SoilType::Peaty => "Peaty",
            SoilType::Desert => "Desert",
            SoilType::Other(name) => name,
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lower-case, trim, fold separators to single spaces
pub(crate) fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
