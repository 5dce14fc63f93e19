//! Crop and Soil Reference Tables
//!
//! ## Architecture
//! - `crop.rs` - CropKind key, CropTemplate record, market/water classes
//! - `soil.rs` - SoilType key, compatibility resolution
//! - `templates.rs` - built-in crop table and the CropCatalog index

pub mod crop;
pub mod soil;
pub mod templates;

pub use crop::{CropKind, CropTemplate, MarketValue, OptimalRange, WaterRequirement};
pub use soil::{SoilMatch, SoilType};
pub use templates::{standard_templates, CropCatalog};
