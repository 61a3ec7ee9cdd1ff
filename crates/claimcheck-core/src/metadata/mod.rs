//! Grouped file metadata.
//!
//! Image tags (TIFF/EXIF/GPS/DNG/XMP) are routed into ten named groups by a
//! fixed, total classification rule; PDF containers expose their document
//! information dictionary through [`PdfMetadata`].

mod extractor;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod gps;
pub mod interpret;
pub(crate) mod pdf;
mod sanitize;
pub mod tags;
pub mod xmp;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use extractor::{ExtractionLimits, MetadataExtractor};
pub(crate) use extractor::read_bounded;
pub use gps::GeoCoordinate;
pub use interpret::{camera_specs, interpretation, render_interpreted, CameraSpecs};
pub use pdf::PdfMetadata;
pub use sanitize::{sanitize_bytes, sanitize_value};

/// Errors that abort extraction for a whole file.
#[derive(Error, Debug)]
pub enum FileAccessError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is {size} bytes, above the {limit} byte limit")]
    TooLarge { path: String, size: u64, limit: u64 },

    #[error("unrecognised container: {0}")]
    Unrecognized(String),
}

/// A single tag or field that could not be decoded. Extraction continues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// Where the problem occurred (e.g. "exif", "xmp", "basic_info")
    pub location: String,
    pub message: String,
}

impl ParseWarning {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// A sanitized metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<MetadataValue>),
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Int(i) => Some(*i as f64),
            MetadataValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetadataValue::Int(i) => Some(*i),
            MetadataValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MetadataValue]> {
        match self {
            MetadataValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Int(i) => write!(f, "{}", i),
            MetadataValue::Float(v) => write!(f, "{}", v),
            MetadataValue::Text(s) => f.write_str(s),
            MetadataValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            MetadataValue::Map(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<u32> for MetadataValue {
    fn from(value: u32) -> Self {
        MetadataValue::Int(i64::from(value))
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

/// The ten metadata groups, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataGroup {
    BasicInfo,
    TiffStructure,
    DngCalibration,
    ExifCamera,
    GpsLocation,
    XmpCamera,
    XmpVendor,
    XmpLightSensor,
    Proprietary,
    Unknown,
}

impl MetadataGroup {
    pub const ALL: [MetadataGroup; 10] = [
        MetadataGroup::BasicInfo,
        MetadataGroup::TiffStructure,
        MetadataGroup::DngCalibration,
        MetadataGroup::ExifCamera,
        MetadataGroup::GpsLocation,
        MetadataGroup::XmpCamera,
        MetadataGroup::XmpVendor,
        MetadataGroup::XmpLightSensor,
        MetadataGroup::Proprietary,
        MetadataGroup::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataGroup::BasicInfo => "basic_info",
            MetadataGroup::TiffStructure => "tiff_structure",
            MetadataGroup::DngCalibration => "dng_calibration",
            MetadataGroup::ExifCamera => "exif_camera",
            MetadataGroup::GpsLocation => "gps_location",
            MetadataGroup::XmpCamera => "xmp_camera",
            MetadataGroup::XmpVendor => "xmp_vendor",
            MetadataGroup::XmpLightSensor => "xmp_light_sensor",
            MetadataGroup::Proprietary => "proprietary",
            MetadataGroup::Unknown => "unknown",
        }
    }
}

type Group = BTreeMap<String, MetadataValue>;

/// Metadata of one image file, grouped by origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataGroups {
    pub basic_info: Group,
    pub tiff_structure: Group,
    pub dng_calibration: Group,
    pub exif_camera: Group,
    pub gps_location: Group,
    pub xmp_camera: Group,
    pub xmp_vendor: Group,
    pub xmp_light_sensor: Group,
    pub proprietary: Group,
    pub unknown: Group,
}

impl MetadataGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self, group: MetadataGroup) -> &Group {
        match group {
            MetadataGroup::BasicInfo => &self.basic_info,
            MetadataGroup::TiffStructure => &self.tiff_structure,
            MetadataGroup::DngCalibration => &self.dng_calibration,
            MetadataGroup::ExifCamera => &self.exif_camera,
            MetadataGroup::GpsLocation => &self.gps_location,
            MetadataGroup::XmpCamera => &self.xmp_camera,
            MetadataGroup::XmpVendor => &self.xmp_vendor,
            MetadataGroup::XmpLightSensor => &self.xmp_light_sensor,
            MetadataGroup::Proprietary => &self.proprietary,
            MetadataGroup::Unknown => &self.unknown,
        }
    }

    pub fn group_mut(&mut self, group: MetadataGroup) -> &mut Group {
        match group {
            MetadataGroup::BasicInfo => &mut self.basic_info,
            MetadataGroup::TiffStructure => &mut self.tiff_structure,
            MetadataGroup::DngCalibration => &mut self.dng_calibration,
            MetadataGroup::ExifCamera => &mut self.exif_camera,
            MetadataGroup::GpsLocation => &mut self.gps_location,
            MetadataGroup::XmpCamera => &mut self.xmp_camera,
            MetadataGroup::XmpVendor => &mut self.xmp_vendor,
            MetadataGroup::XmpLightSensor => &mut self.xmp_light_sensor,
            MetadataGroup::Proprietary => &mut self.proprietary,
            MetadataGroup::Unknown => &mut self.unknown,
        }
    }

    pub fn insert(&mut self, group: MetadataGroup, key: impl Into<String>, value: MetadataValue) {
        self.group_mut(group).insert(key.into(), value);
    }

    pub fn get(&self, group: MetadataGroup, key: &str) -> Option<&MetadataValue> {
        self.group(group).get(key)
    }

    /// Trimmed, non-empty textual value of a key.
    pub fn text(&self, group: MetadataGroup, key: &str) -> Option<String> {
        let value = self.get(group, key)?;
        let text = match value {
            MetadataValue::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Groups that contain `key`. For routed tags this is exactly one.
    pub fn groups_containing(&self, key: &str) -> Vec<MetadataGroup> {
        MetadataGroup::ALL
            .iter()
            .copied()
            .filter(|g| self.group(*g).contains_key(key))
            .collect()
    }

    /// Number of routed tag entries, excluding basic info and derived keys
    /// (those starting with `_`).
    pub fn routed_tag_count(&self) -> usize {
        MetadataGroup::ALL
            .iter()
            .filter(|g| **g != MetadataGroup::BasicInfo)
            .map(|g| self.group(*g).keys().filter(|k| !k.starts_with('_')).count())
            .sum()
    }

    /// Flatten to `"group.key"` entries.
    pub fn to_flat_map(&self) -> BTreeMap<String, MetadataValue> {
        let mut flat = BTreeMap::new();
        for group in MetadataGroup::ALL {
            for (key, value) in self.group(group) {
                flat.insert(format!("{}.{}", group.as_str(), key), value.clone());
            }
        }
        flat
    }

    pub fn is_empty(&self) -> bool {
        MetadataGroup::ALL.iter().all(|g| self.group(*g).is_empty())
    }
}

/// Counters describing one extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Primary-image tags seen in the tag directories
    pub observed_tags: usize,
    /// Tags placed into a group (the XMP packet tag counts as routed into the XMP groups)
    pub routed_tags: usize,
    /// Tags dropped by the tag limit or belonging to secondary images
    pub skipped_tags: usize,
    /// Properties read from the XMP packet
    pub xmp_properties: usize,
}

/// Result of extracting one image file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub groups: MetadataGroups,
    pub warnings: Vec<ParseWarning>,
    pub stats: ExtractionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_map_prefixes_group() {
        let mut groups = MetadataGroups::new();
        groups.insert(MetadataGroup::TiffStructure, "Make", "MicaSense".into());
        groups.insert(MetadataGroup::GpsLocation, "_latitude_decimal", 49.5.into());

        let flat = groups.to_flat_map();
        assert_eq!(flat.get("tiff_structure.Make"), Some(&MetadataValue::from("MicaSense")));
        assert!(flat.contains_key("gps_location._latitude_decimal"));
    }

    #[test]
    fn test_routed_count_skips_derived_and_basic() {
        let mut groups = MetadataGroups::new();
        groups.insert(MetadataGroup::BasicInfo, "width", 100i64.into());
        groups.insert(MetadataGroup::GpsLocation, "GPSLatitude", 1i64.into());
        groups.insert(MetadataGroup::GpsLocation, "_latitude_decimal", 1.0.into());
        groups.insert(MetadataGroup::Proprietary, "48020", "x".into());
        assert_eq!(groups.routed_tag_count(), 2);
    }

    #[test]
    fn test_text_trims_and_skips_empty() {
        let mut groups = MetadataGroups::new();
        groups.insert(MetadataGroup::TiffStructure, "Make", "  Canon ".into());
        groups.insert(MetadataGroup::TiffStructure, "Model", "".into());
        assert_eq!(groups.text(MetadataGroup::TiffStructure, "Make").as_deref(), Some("Canon"));
        assert_eq!(groups.text(MetadataGroup::TiffStructure, "Model"), None);
        assert_eq!(groups.text(MetadataGroup::TiffStructure, "Software"), None);
    }

    #[test]
    fn test_untagged_serialization() {
        let value = MetadataValue::List(vec![49i64.into(), 7i64.into(), 24.12.into()]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "[49,7,24.12]");
    }
}
