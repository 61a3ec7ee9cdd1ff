//! Engine configuration.
//!
//! Every threshold, keyword list, territory bound, processing rule and
//! resource limit is data. Configs are YAML or JSON documents validated
//! against an embedded JSON Schema, then checked for semantic consistency.
//! Missing sections fall back to the defaults.

mod rules;
mod schema;
mod territory;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use rules::ProcessingRules;
pub use schema::validate_config_schema;
pub use territory::{Bounds, OutsideHints, RegionRule, TerritoryConfig};

pub use crate::issues::KeywordConfig;
pub use crate::metadata::ExtractionLimits;
use crate::types::{CreationMethod, DocumentAnalysis, DocumentKind, FileType};

pub const CONFIG_VERSION: &str = "1.0";

/// Errors that can occur when loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config does not match schema: {}", .0.join("; "))]
    Schema(Vec<String>),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateConfig {
    /// Captures before this date are errors
    pub min_date: NaiveDate,
    /// Captures before this year are suspicious
    pub sanity_year: i32,
    /// chrono format strings, tried in order
    pub formats: Vec<String>,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            min_date: NaiveDate::from_ymd_opt(2022, 2, 24).unwrap_or(NaiveDate::MIN),
            sanity_year: 2020,
            formats: [
                "%Y:%m:%d %H:%M:%S",
                "%Y-%m-%d %H:%M:%S",
                "%Y:%m:%d",
                "%Y-%m-%d",
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%dT%H:%M:%SZ",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    /// Image editing tools; matched against Software and PDF Producer
    pub editing_software: Vec<String>,
    /// Known capture devices and apps; matched against Software, Make, Model
    pub legitimate_software: Vec<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        fn words(list: &[&str]) -> Vec<String> {
            list.iter().map(|w| w.to_string()).collect()
        }
        Self {
            editing_software: words(&[
                "photoshop",
                "gimp",
                "lightroom",
                "capture one",
                "affinity",
                "pixelmator",
                "paint.net",
                "corel",
                "snapseed",
                "vsco",
            ]),
            legitimate_software: words(&[
                "camera",
                "samsung",
                "huawei",
                "xiaomi",
                "oppo",
                "vivo",
                "oneplus",
                "google",
                "apple",
                "iphone",
                "dji",
                "micasense",
                "pix4d",
            ]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrityConfig {
    /// Either side below this is low resolution
    pub min_dimension: u32,
    /// Either side above this is noted
    pub max_dimension: u32,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            min_dimension: 500,
            max_dimension: 10000,
        }
    }
}

/// Per-kind replacements for the built-in processing rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleOverrides {
    pub images: BTreeMap<DocumentKind, ProcessingRules>,
    pub pdfs: BTreeMap<DocumentKind, ProcessingRules>,
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub config_version: String,
    pub territory: TerritoryConfig,
    pub dates: DateConfig,
    pub device: DeviceConfig,
    pub integrity: IntegrityConfig,
    pub limits: ExtractionLimits,
    pub keywords: KeywordConfig,
    pub rules: RuleOverrides,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION.to_string(),
            territory: TerritoryConfig::default(),
            dates: DateConfig::default(),
            device: DeviceConfig::default(),
            integrity: IntegrityConfig::default(),
            limits: ExtractionLimits::default(),
            keywords: KeywordConfig::default(),
            rules: RuleOverrides::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Self::from_value(serde_json::json!({}));
        }
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a config from JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a config from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load by extension: `.json` is JSON, anything else YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path),
            _ => Self::from_yaml_file(path),
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        // An empty YAML document parses as null
        let value = if value.is_null() {
            serde_json::json!({})
        } else {
            value
        };
        validate_config_schema(&value).map_err(ConfigError::Schema)?;
        let config: EngineConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic checks the schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.territory.bounds;
        if b.min_lat >= b.max_lat || b.min_lon >= b.max_lon {
            return Err(ConfigError::Invalid(
                "territory bounds must satisfy min < max".to_string(),
            ));
        }
        if self.integrity.min_dimension == 0 || self.integrity.min_dimension > self.integrity.max_dimension {
            return Err(ConfigError::Invalid(
                "integrity dimensions must satisfy 0 < min_dimension <= max_dimension".to_string(),
            ));
        }
        if self.dates.formats.is_empty() {
            return Err(ConfigError::Invalid("dates.formats must not be empty".to_string()));
        }
        for (name, set) in [
            ("critical", &self.keywords.critical),
            ("technical", &self.keywords.technical),
            ("suspicious", &self.keywords.suspicious),
        ] {
            if set.is_empty() {
                return Err(ConfigError::Invalid(format!("keywords.{} must not be empty", name)));
            }
        }
        let limits = &self.limits;
        if limits.max_file_bytes == 0 || limits.max_xmp_bytes == 0 || limits.max_tags == 0 || limits.max_xml_depth == 0 {
            return Err(ConfigError::Invalid("limits must be positive".to_string()));
        }
        Ok(())
    }

    /// Processing rules for an analysed file.
    ///
    /// Screenshot PDFs are always rejected; otherwise a configured override
    /// for the kind replaces the built-in rules.
    pub fn rules_for(&self, analysis: &DocumentAnalysis) -> ProcessingRules {
        let kind = analysis.document_type;
        match analysis.file_type {
            FileType::Image => self
                .rules
                .images
                .get(&kind)
                .cloned()
                .unwrap_or_else(|| ProcessingRules::image_rules(kind)),
            FileType::Pdf if analysis.creation_method == CreationMethod::Screenshot => {
                ProcessingRules::pdf_rules(kind, CreationMethod::Screenshot)
            }
            FileType::Pdf => self
                .rules
                .pdfs
                .get(&kind)
                .cloned()
                .unwrap_or_else(|| ProcessingRules::pdf_rules(kind, analysis.creation_method)),
            FileType::Unknown => ProcessingRules::default(),
        }
    }

    /// Earliest acceptable capture date under `rules`.
    pub fn min_date(&self, rules: &ProcessingRules) -> NaiveDate {
        rules.min_date.unwrap_or(self.dates.min_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CONFIG: &str = r#"
config_version: "1.1"
territory:
  name: "Ukraine"
  bounds:
    min_lat: 44.0
    max_lat: 52.5
    min_lon: 22.0
    max_lon: 40.5
dates:
  min_date: 2022-02-24
integrity:
  min_dimension: 800
keywords:
  version: "test-1"
rules:
  images:
    property_exterior:
      require_gps: true
  pdfs:
    damage_act:
      check_encryption: false
"#;

    #[test]
    fn test_parse_yaml_config() {
        let config = EngineConfig::from_yaml(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.config_version, "1.1");
        assert_eq!(config.integrity.min_dimension, 800);
        assert_eq!(config.integrity.max_dimension, 10000);
        assert_eq!(config.keywords.version, "test-1");
        assert!(!config.keywords.critical.is_empty());
        assert_eq!(config.dates.min_date, NaiveDate::from_ymd_opt(2022, 2, 24).unwrap());
    }

    #[test]
    fn test_empty_documents_use_defaults() {
        assert_eq!(EngineConfig::from_yaml("").unwrap(), EngineConfig::default());
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected_by_schema() {
        let result = EngineConfig::from_yaml("territory:\n  radius: 5\n");
        assert!(matches!(result, Err(ConfigError::Schema(_))));
    }

    #[test]
    fn test_inverted_bounds_invalid() {
        let yaml = r#"
territory:
  bounds: { min_lat: 52.5, max_lat: 44.0, min_lon: 22.0, max_lon: 40.5 }
"#;
        assert!(matches!(EngineConfig::from_yaml(yaml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_empty_keyword_set_invalid() {
        let json = r#"{ "keywords": { "critical": [] } }"#;
        assert!(matches!(EngineConfig::from_json(json), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rules_for_uses_overrides() {
        let config = EngineConfig::from_yaml(SAMPLE_CONFIG).unwrap();

        let exterior = DocumentAnalysis::new(
            FileType::Image,
            DocumentKind::PropertyExterior,
            CreationMethod::Unknown,
            0.9,
        );
        assert!(config.rules_for(&exterior).require_gps);

        let act = DocumentAnalysis::new(FileType::Pdf, DocumentKind::DamageAct, CreationMethod::Scanned, 0.9);
        assert!(!config.rules_for(&act).check_encryption);

        let screenshot_act =
            DocumentAnalysis::new(FileType::Pdf, DocumentKind::DamageAct, CreationMethod::Screenshot, 0.9);
        assert!(config.rules_for(&screenshot_act).auto_reject);

        let damage = DocumentAnalysis::new(
            FileType::Image,
            DocumentKind::DamagePhoto,
            CreationMethod::Unknown,
            0.9,
        );
        assert!(config.rules_for(&damage).require_date);
    }

    #[test]
    fn test_rule_min_date_overrides_config() {
        let config = EngineConfig::default();
        let rules = ProcessingRules {
            min_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            ..ProcessingRules::default()
        };
        assert_eq!(config.min_date(&rules), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(config.min_date(&ProcessingRules::default()), config.dates.min_date);
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, serde_json::to_string_pretty(&EngineConfig::default()).unwrap()).unwrap();
        assert_eq!(EngineConfig::from_file(&path).unwrap(), EngineConfig::default());
    }
}
