//! Crop Template Catalog
//!
//! Static reference table of crop templates, built once and shared read-only.
//! Values are typical ranges for Indian growing conditions.

use rustc_hash::FxHashMap;
use std::sync::OnceLock;

use super::crop::{CropKind, CropTemplate, MarketValue, OptimalRange, WaterRequirement};
use super::soil::SoilType;
use crate::error::{AdvisorError, AdvisorResult};

/// Ordered set of crop templates with an index by `CropKind`
#[derive(Debug, Clone)]
pub struct CropCatalog {
    templates: Vec<CropTemplate>,
    by_kind: FxHashMap<CropKind, usize>,
}

impl CropCatalog {
    /// Build a catalog from templates. Later duplicates of a kind are ignored
    /// by lookups but keep their position in `templates()`.
    pub fn new(templates: Vec<CropTemplate>) -> Self {
        let mut by_kind = FxHashMap::default();
        for (idx, template) in templates.iter().enumerate() {
            by_kind.entry(template.kind).or_insert(idx);
        }

        Self { templates, by_kind }
    }

    /// Process-wide default catalog
    pub fn standard() -> &'static CropCatalog {
        static CATALOG: OnceLock<CropCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| CropCatalog::new(standard_templates()))
    }

    pub fn templates(&self) -> &[CropTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, kind: CropKind) -> Option<&CropTemplate> {
        self.by_kind.get(&kind).map(|&idx| &self.templates[idx])
    }

    /// Look up a template by crop name or alias
    pub fn find(&self, name: &str) -> AdvisorResult<&CropTemplate> {
        CropKind::parse(name)
            .and_then(|kind| self.get(kind))
            .ok_or_else(|| AdvisorError::UnknownCrop(name.trim().to_string()))
    }
}

impl Default for CropCatalog {
    fn default() -> Self {
        CropCatalog::new(standard_templates())
    }
}

#[allow(clippy::too_many_arguments)]
fn template(
    kind: CropKind,
    temperature: (f64, f64),
    rainfall: (f64, f64),
    soils: &[SoilType],
    sunshine: (f64, f64),
    base_yield_t_ha: f64,
    growth_days: u32,
    water_requirement: WaterRequirement,
    market_value: MarketValue,
) -> CropTemplate {
    CropTemplate {
        kind,
        name: kind.display_name().to_string(),
        temperature: OptimalRange::new(temperature.0, temperature.1),
        rainfall: OptimalRange::new(rainfall.0, rainfall.1),
        soils: soils.to_vec(),
        sunshine: OptimalRange::new(sunshine.0, sunshine.1),
        base_yield_t_ha,
        growth_days,
        water_requirement,
        market_value,
    }
}

/// The built-in crop table
pub fn standard_templates() -> Vec<CropTemplate> {
    use MarketValue as M;
    use SoilType::*;
    use WaterRequirement as W;

    vec![
        template(CropKind::Rice, (20.0, 35.0), (1000.0, 2500.0),
            &[Clay, ClayLoam, Loamy, Alluvial], (6.0, 12.0), 4.0, 120, W::High, M::High),
        template(CropKind::Wheat, (10.0, 25.0), (400.0, 1100.0),
            &[Loamy, ClayLoam, Alluvial, Black], (6.0, 10.0), 3.5, 120, W::Medium, M::High),
        template(CropKind::Maize, (18.0, 32.0), (500.0, 1200.0),
            &[Loamy, SandyLoam, Alluvial, Red], (7.0, 12.0), 5.0, 100, W::Medium, M::Medium),
        template(CropKind::Cotton, (21.0, 35.0), (500.0, 1000.0),
            &[Black, Alluvial, ClayLoam], (8.0, 12.0), 1.8, 170, W::Medium, M::High),
        template(CropKind::Sugarcane, (20.0, 38.0), (1100.0, 2500.0),
            &[Loamy, ClayLoam, Alluvial, Black], (7.0, 12.0), 70.0, 330, W::High, M::Medium),
        template(CropKind::Soybean, (18.0, 32.0), (600.0, 1100.0),
            &[Loamy, ClayLoam, Black], (6.0, 10.0), 2.5, 100, W::Medium, M::Medium),
        template(CropKind::Groundnut, (22.0, 33.0), (500.0, 1000.0),
            &[SandyLoam, Sandy, Red, Loamy], (7.0, 11.0), 2.0, 110, W::Low, M::Medium),
        template(CropKind::Chickpea, (15.0, 28.0), (300.0, 700.0),
            &[Loamy, SandyLoam, Black], (6.0, 10.0), 1.5, 100, W::Low, M::Medium),
        template(CropKind::Potato, (15.0, 25.0), (500.0, 900.0),
            &[SandyLoam, Loamy, SiltLoam], (5.0, 9.0), 25.0, 100, W::Medium, M::Medium),
        template(CropKind::Tomato, (18.0, 30.0), (600.0, 1200.0),
            &[Loamy, SandyLoam, Red], (6.0, 10.0), 30.0, 90, W::Medium, M::High),
        template(CropKind::Millet, (25.0, 35.0), (250.0, 700.0),
            &[Sandy, SandyLoam, Red, Desert], (8.0, 12.0), 1.5, 85, W::Low, M::Low),
        template(CropKind::Mustard, (10.0, 25.0), (250.0, 500.0),
            &[Loamy, SandyLoam, Alluvial], (6.0, 9.0), 1.4, 110, W::Low, M::Medium),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_covers_every_kind() {
        let catalog = CropCatalog::standard();
        assert_eq!(catalog.len(), CropKind::all().len());
        for kind in CropKind::all() {
            assert!(catalog.get(*kind).is_some(), "missing template for {}", kind);
        }
    }

    #[test]
    fn test_rice_template() {
        let rice = CropCatalog::standard().get(CropKind::Rice).unwrap();
        assert_eq!(rice.temperature, OptimalRange::new(20.0, 35.0));
        assert_eq!(rice.rainfall, OptimalRange::new(1000.0, 2500.0));
        assert!(rice.soils.contains(&SoilType::Loamy));
        assert_eq!(rice.sunshine, OptimalRange::new(6.0, 12.0));
        assert_eq!(rice.market_value, MarketValue::High);
    }

    #[test]
    fn test_find_by_alias() {
        let catalog = CropCatalog::standard();
        assert_eq!(catalog.find("paddy").unwrap().kind, CropKind::Rice);
        assert_eq!(
            catalog.find(" Quinoa "),
            Err(AdvisorError::UnknownCrop("Quinoa".to_string()))
        );
    }

    #[test]
    fn test_ranges_are_well_formed() {
        for t in standard_templates() {
            assert!(t.temperature.min < t.temperature.max, "{}", t.name);
            assert!(t.rainfall.min < t.rainfall.max, "{}", t.name);
            assert!(t.sunshine.min < t.sunshine.max, "{}", t.name);
            assert!(!t.soils.is_empty(), "{}", t.name);
            assert!(t.base_yield_t_ha > 0.0, "{}", t.name);
        }
    }

    #[test]
    fn test_duplicate_kind_keeps_first() {
        let mut templates = standard_templates();
        let mut second_rice = templates[0].clone();
        second_rice.base_yield_t_ha = 9.9;
        templates.push(second_rice);

        let catalog = CropCatalog::new(templates);
        assert_eq!(catalog.get(CropKind::Rice).unwrap().base_yield_t_ha, 4.0);
        assert_eq!(catalog.len(), 13);
    }
}
