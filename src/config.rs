//! Configuration
//!
//! `InputDefaults` lists every optional input the engines recognize together
//! with the value used when a caller leaves it out. Defaults are applied once,
//! when a `FieldObservation` is validated into an `EnvironmentalInput`.
//!
//! `AdvisorConfig` holds server options read from the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::CropCatalog;
use crate::input::GrowthStage;

/// Fallback values for optional observation fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDefaults {
    /// Relative humidity (%) when no reading is supplied
    pub humidity_pct: f64,
    /// Days since the field was last watered
    pub days_since_irrigation: u32,
    pub growth_stage: GrowthStage,
    /// Sunshine used for the radiation term of ET0 only. Suitability scoring
    /// never sees this value.
    pub radiation_sunshine_hours: f64,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            humidity_pct: 60.0,
            days_since_irrigation: 3,
            growth_stage: GrowthStage::Vegetative,
            radiation_sunshine_hours: 8.0,
        }
    }
}

/// Per-request context handed to every engine entry point
#[derive(Debug, Clone)]
pub struct AdvisorContext {
    pub catalog: CropCatalog,
    pub defaults: InputDefaults,
}

impl AdvisorContext {
    pub fn new(catalog: CropCatalog, defaults: InputDefaults) -> Self {
        Self { catalog, defaults }
    }
}

impl Default for AdvisorContext {
    fn default() -> Self {
        Self::new(CropCatalog::standard().clone(), InputDefaults::default())
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Directory holding groundwater_snapshot.csv, groundwater_history.csv
    /// and prices.csv
    pub data_dir: PathBuf,
    pub port: u16,
    pub cache_capacity: u64,
    pub cache_ttl_secs: u64,
    pub defaults: InputDefaults,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            port: 3000,
            cache_capacity: 10_000,
            cache_ttl_secs: 300,
            defaults: InputDefaults::default(),
        }
    }
}

impl AdvisorConfig {
    /// Read DATA_DIR, PORT, ADVISOR_CACHE_CAPACITY, ADVISOR_CACHE_TTL_SECS and
    /// the ADVISOR_DEFAULT_* input defaults (HUMIDITY, DAYS_SINCE_IRRIGATION,
    /// GROWTH_STAGE, SUNSHINE_HOURS)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparsable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.port = parse_or("PORT", lookup("PORT"), config.port);
        config.cache_capacity = parse_or(
            "ADVISOR_CACHE_CAPACITY",
            lookup("ADVISOR_CACHE_CAPACITY"),
            config.cache_capacity,
        );
        config.cache_ttl_secs = parse_or(
            "ADVISOR_CACHE_TTL_SECS",
            lookup("ADVISOR_CACHE_TTL_SECS"),
            config.cache_ttl_secs,
        );

        let defaults = &mut config.defaults;
        defaults.humidity_pct = within(
            parse_or(
                "ADVISOR_DEFAULT_HUMIDITY",
                lookup("ADVISOR_DEFAULT_HUMIDITY"),
                defaults.humidity_pct,
            ),
            defaults.humidity_pct,
            100.0,
        );
        defaults.days_since_irrigation = parse_or(
            "ADVISOR_DEFAULT_DAYS_SINCE_IRRIGATION",
            lookup("ADVISOR_DEFAULT_DAYS_SINCE_IRRIGATION"),
            defaults.days_since_irrigation,
        );
        defaults.growth_stage = parse_or(
            "ADVISOR_DEFAULT_GROWTH_STAGE",
            lookup("ADVISOR_DEFAULT_GROWTH_STAGE"),
            defaults.growth_stage,
        );
        defaults.radiation_sunshine_hours = within(
            parse_or(
                "ADVISOR_DEFAULT_SUNSHINE_HOURS",
                lookup("ADVISOR_DEFAULT_SUNSHINE_HOURS"),
                defaults.radiation_sunshine_hours,
            ),
            defaults.radiation_sunshine_hours,
            24.0,
        );

        config
    }

    pub fn groundwater_path(&self) -> PathBuf {
        self.data_dir.join("groundwater_snapshot.csv")
    }

    pub fn prices_path(&self) -> PathBuf {
        self.data_dir.join("prices.csv")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("groundwater_history.csv")
    }
}

/// Clamp to [0, max]; non-finite values keep the fallback
fn within(value: f64, fallback: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        fallback
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, fallback: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match raw {
        None => fallback,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring {}={:?}, using {}", key, value, fallback);
            fallback
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::from_lookup(|_| None);
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.defaults.humidity_pct, 60.0);
        assert_eq!(config.groundwater_path(), PathBuf::from("data/groundwater_snapshot.csv"));
    }

    #[test]
    fn test_lookup_overrides() {
        let env: HashMap<&str, &str> = [
            ("DATA_DIR", "/srv/advisor"),
            ("PORT", "8080"),
            ("ADVISOR_CACHE_TTL_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = AdvisorConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/srv/advisor"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.prices_path(), PathBuf::from("/srv/advisor/prices.csv"));
    }

    #[test]
    fn test_input_default_overrides() {
        let env: HashMap<&str, &str> = [
            ("ADVISOR_DEFAULT_HUMIDITY", "45"),
            ("ADVISOR_DEFAULT_DAYS_SINCE_IRRIGATION", "1"),
            ("ADVISOR_DEFAULT_GROWTH_STAGE", "Flowering"),
            ("ADVISOR_DEFAULT_SUNSHINE_HOURS", "40"),
        ]
        .into_iter()
        .collect();

        let config = AdvisorConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.defaults.humidity_pct, 45.0);
        assert_eq!(config.defaults.days_since_irrigation, 1);
        assert_eq!(config.defaults.growth_stage, GrowthStage::Flowering);
        assert_eq!(config.defaults.radiation_sunshine_hours, 24.0);

        let config = AdvisorConfig::from_lookup(|key| {
            (key == "ADVISOR_DEFAULT_GROWTH_STAGE").then(|| "ripening".to_string())
        });
        assert_eq!(config.defaults.growth_stage, GrowthStage::Vegetative);
    }

    #[test]
    fn test_input_defaults_partial_json() {
        let defaults: InputDefaults = serde_json::from_str(r#"{"humidity_pct": 45.0}"#).unwrap();
        assert_eq!(defaults.humidity_pct, 45.0);
        assert_eq!(defaults.days_since_irrigation, 3);
        assert_eq!(defaults.growth_stage, GrowthStage::Vegetative);
    }
}
